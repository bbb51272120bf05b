//! Notification log HTTP handlers.
//!
//! ```text
//! GET  /api/v1/notifications?limit=20
//! POST /api/v1/notifications/{notification_id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, NotificationId, PageLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::NotificationResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Page size query shared by list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum number of records, clamped to 1..=100 (default 50).
    pub limit: Option<usize>,
}

impl LimitQuery {
    pub(crate) fn page_limit(&self) -> PageLimit {
        PageLimit::clamped(self.limit)
    }
}

/// List the caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(LimitQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = [NotificationResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let notifications = state.inbox.list(&user_id, query.page_limit()).await?;
    let body: Vec<NotificationResponse> =
        notifications.iter().map(NotificationResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "private, no-store"))
        .json(body))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{notification_id}/read",
    params(("notification_id" = String, Path, description = "Notification")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{notification_id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let notification_id =
        parse_id::<NotificationId>(&path.into_inner(), FieldName::new("notificationId"))?;
    state.inbox.mark_read(&user_id, &notification_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
