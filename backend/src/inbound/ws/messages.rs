//! Wire-level push payloads for the WebSocket adapter.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```text
//! {"type":"NOTIFICATION","notification":{"id":"…","kind":"SHIPPED",…}}
//! {"type":"CHAT_MESSAGE","message":{"id":"…","senderId":"…",…}}
//! ```

use serde::Serialize;

use crate::domain::PushPayload;
use crate::inbound::http::schemas::{ChatMessageResponse, NotificationResponse};

/// Outbound frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PushMessage {
    /// A stored notification.
    Notification {
        /// Notification body, identical to the REST representation.
        notification: NotificationResponse,
    },
    /// A stored chat message.
    ChatMessage {
        /// Message body, identical to the REST representation.
        message: ChatMessageResponse,
    },
}

impl From<&PushPayload> for PushMessage {
    fn from(payload: &PushPayload) -> Self {
        match payload {
            PushPayload::Notification(notification) => Self::Notification {
                notification: NotificationResponse::from(notification),
            },
            PushPayload::ChatMessage(message) => Self::ChatMessage {
                message: ChatMessageResponse::from(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_doubles::fixture_timestamp;
    use crate::domain::{
        ChatMessage, ChatMessageDraft, ChatMessageId, Notification, NotificationDraft,
        NotificationId, NotificationKind, UserId,
    };
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn notifications_are_tagged_with_their_kind() {
        let payload = PushPayload::Notification(Notification::record(
            NotificationId::random(),
            NotificationDraft {
                recipient: UserId::random(),
                kind: NotificationKind::Canceled,
                content: "Order canceled".to_owned(),
                related_id: uuid::Uuid::nil(),
            },
            fixture_timestamp(),
        ));
        let value: Value =
            serde_json::to_value(PushMessage::from(&payload)).expect("serialise");
        assert_eq!(value["type"], "NOTIFICATION");
        assert_eq!(value["notification"]["kind"], "CANCELED");
    }

    #[rstest]
    fn chat_messages_use_the_message_field() {
        let payload = PushPayload::ChatMessage(
            ChatMessage::new(
                ChatMessageId::random(),
                ChatMessageDraft {
                    sender_id: UserId::random(),
                    receiver_id: UserId::random(),
                    content: "hi".to_owned(),
                },
                fixture_timestamp(),
            )
            .expect("message"),
        );
        let value: Value =
            serde_json::to_value(PushMessage::from(&payload)).expect("serialise");
        assert_eq!(value["type"], "CHAT_MESSAGE");
        assert_eq!(value["message"]["content"], "hi");
    }
}
