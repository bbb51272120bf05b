//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST endpoint and the WebSocket upgrade route,
//! the request and response DTOs from the HTTP adapter, and the domain error
//! payload. Swagger UI serves it in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::engagement::ContentRequest;
use crate::inbound::http::messages::SendMessageRequest;
use crate::inbound::http::schemas::{
    ChatMessageResponse, ChatThreadResponse, CommunityPostResponse, ItemSummary,
    NotificationResponse, TransactionResponse,
};
use crate::inbound::http::transactions::{PurchaseRequest, ReviewRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the marketplace API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace transaction API",
        description = "Purchases, reviews, engagement, notifications, and direct messages.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::transactions::create_purchase,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::transactions::get_transaction,
        crate::inbound::http::transactions::mark_shipped,
        crate::inbound::http::transactions::post_review,
        crate::inbound::http::transactions::cancel,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::chat_threads,
        crate::inbound::http::messages::chat_history,
        crate::inbound::http::engagement::like_item,
        crate::inbound::http::engagement::comment_on_item,
        crate::inbound::http::engagement::follow_user,
        crate::inbound::http::engagement::post_to_community,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::ws::ws_entry,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        LoginResponse,
        PurchaseRequest,
        ReviewRequest,
        SendMessageRequest,
        ContentRequest,
        ItemSummary,
        TransactionResponse,
        NotificationResponse,
        ChatMessageResponse,
        ChatThreadResponse,
        CommunityPostResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "transactions", description = "Purchase lifecycle"),
        (name = "notifications", description = "Notification feed and push channel"),
        (name = "messages", description = "Direct messages between users"),
        (name = "engagement", description = "Likes, comments, follows, and community posts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
