//! Login and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"token":"dev-token:3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! POST /api/v1/logout
//! ```
//!
//! Credential checks belong to the identity provider; this adapter only
//! exchanges the token it issued for a session cookie.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::IdentityVerificationError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Token issued by the identity provider.
    #[schema(example = "dev-token:3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub token: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated user.
    pub user_id: Uuid,
}

fn map_identity_error(error: IdentityVerificationError) -> Error {
    match error {
        IdentityVerificationError::Rejected { message } => {
            info!(reason = %message, "identity token rejected");
            Error::unauthorized("invalid credentials")
        }
        IdentityVerificationError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
    }
}

/// Verify an identity token and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { token } = payload.into_inner();
    require_text(&token, FieldName::new("token"))?;
    let user_id = state
        .identity
        .verify(token.trim())
        .await
        .map_err(map_identity_error)?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        user_id: user_id.into(),
    }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::FIXTURE_TOKEN_PREFIX;
    use crate::inbound::http::test_utils::{TestPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn valid_tokens_establish_a_session() {
        let user = UserId::random();
        let app = test::init_service(test_app(TestPorts::default())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "token": format!("{FIXTURE_TOKEN_PREFIX}{user}") }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
        let body: LoginResponse = test::read_body_json(res).await;
        assert_eq!(body.user_id, Uuid::from(user));
    }

    #[rstest]
    #[case(json!({ "token": "" }), StatusCode::BAD_REQUEST)]
    #[case(json!({ "token": "guess" }), StatusCode::UNAUTHORIZED)]
    #[case(json!({}), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn bad_tokens_are_rejected(#[case] body: Value, #[case] expected: StatusCode) {
        let app = test::init_service(test_app(TestPorts::default())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn logout_returns_no_content() {
        let app = test::init_service(test_app(TestPorts::default())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/logout").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[std::prelude::v1::test]
    fn unavailable_providers_map_to_503() {
        let err = map_identity_error(IdentityVerificationError::unavailable("timeout"));
        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
