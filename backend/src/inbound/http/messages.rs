//! Direct message HTTP handlers.
//!
//! ```text
//! POST /api/v1/messages {"receiverId":"…","content":"Is it still available?"}
//! GET  /api/v1/messages?limit=20
//! GET  /api/v1/messages/{peer_id}?limit=50
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChatMessageDraft, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::notifications::LimitQuery;
use crate::inbound::http::schemas::{ChatMessageResponse, ChatThreadResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Body for `POST /api/v1/messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Addressee.
    pub receiver_id: String,
    /// Message text, at most 2000 characters.
    pub content: String,
}

/// Send a direct message; it is stored and pushed if the receiver is online.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = ChatMessageResponse),
        (status = 400, description = "Invalid receiver or content", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let sender_id = session.require_user_id()?;
    let SendMessageRequest {
        receiver_id,
        content,
    } = payload.into_inner();
    let receiver_id = parse_id::<UserId>(&receiver_id, FieldName::new("receiverId"))?;
    let message = state
        .chat
        .send(ChatMessageDraft {
            sender_id,
            receiver_id,
            content,
        })
        .await?;
    Ok(HttpResponse::Created().json(ChatMessageResponse::from(&message)))
}

/// The caller's conversations, each with its latest message, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    params(LimitQuery),
    responses(
        (status = 200, description = "Threads, newest first", body = [ChatThreadResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["messages"],
    operation_id = "chatThreads"
)]
#[get("/messages")]
pub async fn chat_threads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<ChatThreadResponse>>> {
    let user_id = session.require_user_id()?;
    let threads = state.chat.threads(&user_id, query.page_limit()).await?;
    Ok(web::Json(threads.iter().map(ChatThreadResponse::from).collect()))
}

/// Conversation with a peer, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{peer_id}",
    params(("peer_id" = String, Path, description = "Other participant"), LimitQuery),
    responses(
        (status = 200, description = "Messages, oldest first", body = [ChatMessageResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "chatHistory"
)]
#[get("/messages/{peer_id}")]
pub async fn chat_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<ChatMessageResponse>>> {
    let user_id = session.require_user_id()?;
    let peer_id = parse_id::<UserId>(&path.into_inner(), FieldName::new("peerId"))?;
    let messages = state
        .chat
        .history(&user_id, &peer_id, query.page_limit())
        .await?;
    Ok(web::Json(
        messages.iter().map(ChatMessageResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockChatMessaging;
    use crate::domain::{ChatMessage, ChatMessageId, ChatThread, PageLimit};
    use crate::inbound::http::test_utils::{TestPorts, login_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn sending_stores_the_message_as_the_caller() {
        let sender = UserId::random();
        let receiver = UserId::random();
        let mut chat = MockChatMessaging::new();
        chat.expect_send()
            .withf(move |draft| draft.sender_id == sender && draft.receiver_id == receiver)
            .times(1)
            .returning(|draft| {
                ChatMessage::new(ChatMessageId::random(), draft, Utc::now())
                    .map_err(|err| Error::invalid_request(err.to_string()))
            });
        let app = test::init_service(test_app(TestPorts {
            chat: Arc::new(chat),
            ..TestPorts::default()
        }))
        .await;
        let cookie = login_cookie(&app, &sender).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/messages")
                .cookie(cookie)
                .set_json(json!({ "receiverId": receiver.to_string(), "content": "hello" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["senderId"], sender.to_string());
        assert_eq!(body["content"], "hello");
    }

    #[actix_web::test]
    async fn malformed_receivers_are_rejected_before_the_port() {
        let sender = UserId::random();
        let app = test::init_service(test_app(TestPorts::default())).await;
        let cookie = login_cookie(&app, &sender).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/messages")
                .cookie(cookie)
                .set_json(json!({ "receiverId": "bob", "content": "hello" }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "receiverId");
    }

    #[actix_web::test]
    async fn threads_list_the_peer_and_latest_message() {
        let user = UserId::random();
        let peer = UserId::random();
        let mut chat = MockChatMessaging::new();
        chat.expect_threads()
            .with(eq(user), eq(PageLimit::clamped(Some(5))))
            .times(1)
            .returning(move |_, _| {
                let last_message = ChatMessage::new(
                    ChatMessageId::random(),
                    ChatMessageDraft {
                        sender_id: peer,
                        receiver_id: user,
                        content: "Deal.".to_owned(),
                    },
                    Utc::now(),
                )
                .map_err(|err| Error::invalid_request(err.to_string()))?;
                Ok(vec![ChatThread {
                    peer_id: peer,
                    last_message,
                }])
            });
        let app = test::init_service(test_app(TestPorts {
            chat: Arc::new(chat),
            ..TestPorts::default()
        }))
        .await;
        let cookie = login_cookie(&app, &user).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/messages?limit=5")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["peerId"], peer.to_string());
        assert_eq!(body[0]["lastMessage"]["content"], "Deal.");
    }

    #[actix_web::test]
    async fn history_uses_the_default_limit() {
        let user = UserId::random();
        let peer = UserId::random();
        let mut chat = MockChatMessaging::new();
        chat.expect_history()
            .with(eq(user), eq(peer), eq(PageLimit::default()))
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        let app = test::init_service(test_app(TestPorts {
            chat: Arc::new(chat),
            ..TestPorts::default()
        }))
        .await;
        let cookie = login_cookie(&app, &user).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/messages/{peer}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!([]));
    }
}
