//! Behavioural tests for push channel upgrade validation.

mod market_support;

use std::sync::Arc;

use actix_http::Request;
use actix_web::http::header::HeaderValue;
use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::{StatusCode, header},
    test::{self, TestRequest},
    web,
};
use marketplace::domain::{ConnectionRegistry, UserId};
use marketplace::inbound::ws;
use marketplace::inbound::ws::state::WsState;
use market_support::{Market, api_app, login};
use rstest::{fixture, rstest};

// Example Sec-WebSocket-Key from RFC 6455 section 1.3 used to satisfy handshake requirements.
const RFC6455_SAMPLE_KEY: &str = "dGhlIHNhbXBsZSBub25jZQ==";

#[fixture]
fn ws_state() -> WsState {
    WsState::new(
        Arc::new(ConnectionRegistry::new()),
        [
            "https://market.example",
            "https://chat.market.example",
            "http://localhost:3000",
        ],
    )
}

async fn init_app(
    state: WsState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        api_app(Market::new().http_state)
            .app_data(web::Data::new(state))
            .service(ws::ws_entry),
    )
    .await
}

fn handshake_request() -> TestRequest {
    TestRequest::get()
        .uri("/ws/notifications")
        .insert_header((header::UPGRADE, "websocket"))
        .insert_header((header::CONNECTION, "Upgrade"))
        .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
        .insert_header((header::SEC_WEBSOCKET_KEY, RFC6455_SAMPLE_KEY))
}

#[derive(Debug, Clone, Copy)]
/// Test cases for Origin header validation.
enum OriginHeaderCase {
    /// No Origin header present.
    Missing,
    /// Origin not in the allowlist.
    Unlisted,
    /// Multiple Origin headers (forbidden by RFC 6455).
    Multiple,
    /// Malformed Origin header (invalid UTF-8).
    Malformed,
    /// Right host, wrong port.
    LocalhostOtherPort,
}

fn handshake_request_for_origin_case(origin_case: OriginHeaderCase) -> Request {
    match origin_case {
        OriginHeaderCase::Missing => handshake_request().to_request(),
        OriginHeaderCase::Unlisted => handshake_request()
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Multiple => handshake_request()
            .append_header((header::ORIGIN, "https://market.example"))
            .append_header((header::ORIGIN, "https://example.com"))
            .to_request(),
        OriginHeaderCase::Malformed => {
            // Byte 0x80 is invalid UTF-8, tests parser robustness.
            let invalid = HeaderValue::from_bytes(&[0x80]).expect("opaque Origin header value");
            handshake_request()
                .insert_header((header::ORIGIN, invalid))
                .to_request()
        }
        OriginHeaderCase::LocalhostOtherPort => handshake_request()
            .insert_header((header::ORIGIN, "http://localhost:3001"))
            .to_request(),
    }
}

#[rstest]
#[case("https://market.example")]
#[case("https://chat.market.example")]
#[case("http://localhost:3000")]
fn upgrades_when_origin_allowed_and_logged_in(ws_state: WsState, #[case] origin: &str) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(ws_state).await;
        let cookie = login(&app, &UserId::random()).await;

        let req = handshake_request()
            .insert_header((header::ORIGIN, origin))
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(
            response.status(),
            StatusCode::SWITCHING_PROTOCOLS,
            "origin {origin}"
        );
    });
}

#[rstest]
fn allowed_origin_without_a_session_is_unauthorized(ws_state: WsState) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(ws_state).await;

        let req = handshake_request()
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    });
}

#[rstest]
#[case(OriginHeaderCase::Missing, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Unlisted, StatusCode::FORBIDDEN)]
#[case(OriginHeaderCase::Multiple, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::Malformed, StatusCode::BAD_REQUEST)]
#[case(OriginHeaderCase::LocalhostOtherPort, StatusCode::FORBIDDEN)]
fn rejects_disallowed_origin_headers(
    ws_state: WsState,
    #[case] origin_case: OriginHeaderCase,
    #[case] expected: StatusCode,
) {
    actix_rt::System::new().block_on(async move {
        let app = init_app(ws_state).await;

        let req = handshake_request_for_origin_case(origin_case);
        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), expected, "{origin_case:?}");
    });
}
