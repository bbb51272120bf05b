//! WebSocket inbound adapter delivering pushes to connected users.
//!
//! Responsibilities:
//! - validate upgrade requests (session cookie and origin allow-list)
//! - register each accepted connection in the shared registry
//! - keep WebSocket framing and heartbeats at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

mod channel;
mod session;

pub mod messages;
pub mod state;

pub use channel::WsPushChannel;

/// Upgrade `GET /ws/notifications` for the logged-in user.
#[utoipa::path(
    get,
    path = "/ws/notifications",
    responses(
        (status = 101, description = "Switching to the push channel"),
        (status = 400, description = "Invalid Origin header"),
        (status = 401, description = "Login required"),
        (status = 403, description = "Origin not allowed")
    ),
    tags = ["notifications"],
    operation_id = "connectNotifications"
)]
#[get("/ws/notifications")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state, origin_header)?;

    let user_id = session.require_user_id()?;

    let (response, ws_session, msg_stream) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;

    actix_web::rt::spawn(session::handle_ws_session(
        state.registry.clone(),
        user_id,
        ws_session,
        msg_stream,
    ));
    Ok(response)
}

fn validate_origin(state: &state::WsState, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if state.allows(&origin) {
        Ok(())
    } else {
        warn!(origin = origin_value, "Rejected WS upgrade due to disallowed Origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
