//! Persisted notifications, chat messages, and the payloads pushed to live
//! connections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::item::UnknownStatusError;
use super::{ChatMessageId, NotificationId, UserId};

/// Maximum number of characters in a chat message.
pub const CHAT_MESSAGE_MAX: usize = 2000;

/// Tag describing what a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Seller: an item was purchased.
    Sold,
    /// Buyer: the seller shipped.
    Shipped,
    /// Counterparty: the transaction was reviewed and closed.
    Completed,
    /// Counterparty: receipt was acknowledged.
    Received,
    /// Seller: the buyer or seller canceled.
    Canceled,
    /// Seller: someone liked an item.
    Like,
    /// Seller: someone commented on an item.
    Comment,
    /// User: someone followed them.
    Follow,
    /// Member: activity in a community.
    Community,
}

impl NotificationKind {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sold => "SOLD",
            Self::Shipped => "SHIPPED",
            Self::Completed => "COMPLETED",
            Self::Received => "RECEIVED",
            Self::Canceled => "CANCELED",
            Self::Like => "LIKE",
            Self::Comment => "COMMENT",
            Self::Follow => "FOLLOW",
            Self::Community => "COMMUNITY",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOLD" => Ok(Self::Sold),
            "SHIPPED" => Ok(Self::Shipped),
            "COMPLETED" => Ok(Self::Completed),
            "RECEIVED" => Ok(Self::Received),
            "CANCELED" => Ok(Self::Canceled),
            "LIKE" => Ok(Self::Like),
            "COMMENT" => Ok(Self::Comment),
            "FOLLOW" => Ok(Self::Follow),
            "COMMUNITY" => Ok(Self::Community),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

/// Rendered event ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// User the notification is addressed to.
    pub recipient: UserId,
    /// What happened.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub content: String,
    /// Entity the notification links to (item, user, or community).
    pub related_id: Uuid,
}

/// A stored notification. Only the read flag changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    id: NotificationId,
    recipient: UserId,
    kind: NotificationKind,
    content: String,
    related_id: Uuid,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification from a draft.
    #[must_use]
    pub fn record(id: NotificationId, draft: NotificationDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            recipient: draft.recipient,
            kind: draft.kind,
            content: draft.content,
            related_id: draft.related_id,
            is_read: false,
            created_at,
        }
    }

    /// Copy of this notification with the read flag set.
    #[must_use]
    pub fn marked_read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Addressee.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// What happened.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Human-readable text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Linked entity.
    #[must_use]
    pub const fn related_id(&self) -> Uuid {
        self.related_id
    }

    /// Whether the recipient has seen it.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validation errors for chat messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatMessageValidationError {
    /// Messages must carry text.
    #[error("message content must not be empty")]
    EmptyContent,
    /// Messages are capped at [`CHAT_MESSAGE_MAX`] characters.
    #[error("message content must be at most {max} characters")]
    ContentTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
    /// Users cannot message themselves.
    #[error("cannot send a message to yourself")]
    SelfAddressed,
}

/// Input used to construct a [`ChatMessage`].
#[derive(Debug, Clone)]
pub struct ChatMessageDraft {
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub receiver_id: UserId,
    /// Message text.
    pub content: String,
}

/// A direct message between two users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: ChatMessageId,
    sender_id: UserId,
    receiver_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Validate and construct a message.
    pub fn new(
        id: ChatMessageId,
        draft: ChatMessageDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ChatMessageValidationError> {
        if draft.sender_id == draft.receiver_id {
            return Err(ChatMessageValidationError::SelfAddressed);
        }
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(ChatMessageValidationError::EmptyContent);
        }
        if content.chars().count() > CHAT_MESSAGE_MAX {
            return Err(ChatMessageValidationError::ContentTooLong {
                max: CHAT_MESSAGE_MAX,
            });
        }
        Ok(Self {
            id,
            sender_id: draft.sender_id,
            receiver_id: draft.receiver_id,
            content: content.to_owned(),
            created_at,
        })
    }

    /// Message identifier.
    #[must_use]
    pub const fn id(&self) -> ChatMessageId {
        self.id
    }

    /// Author.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Addressee.
    #[must_use]
    pub const fn receiver_id(&self) -> UserId {
        self.receiver_id
    }

    /// Message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Send time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the message belongs to the conversation between `a` and `b`.
    #[must_use]
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (self.sender_id == *a && self.receiver_id == *b)
            || (self.sender_id == *b && self.receiver_id == *a)
    }

    /// The other participant, if `user` took part in the message.
    #[must_use]
    pub fn peer_of(&self, user: &UserId) -> Option<UserId> {
        if self.sender_id == *user {
            Some(self.receiver_id)
        } else if self.receiver_id == *user {
            Some(self.sender_id)
        } else {
            None
        }
    }
}

/// A user's conversation with one peer, summarised by its latest message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatThread {
    /// The other participant.
    pub peer_id: UserId,
    /// Most recent message in either direction.
    pub last_message: ChatMessage,
}

/// Payload written to a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushPayload {
    /// A freshly stored notification.
    Notification(Notification),
    /// A freshly stored chat message.
    ChatMessage(ChatMessage),
}

/// Number of records returned by a feed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimit(usize);

impl PageLimit {
    /// Limit applied when the caller does not ask for one.
    pub const DEFAULT: usize = 50;
    /// Largest limit honoured.
    pub const MAX: usize = 100;

    /// Clamp a requested limit into `1..=MAX`, defaulting when absent.
    #[must_use]
    pub fn clamped(requested: Option<usize>) -> Self {
        Self(requested.unwrap_or(Self::DEFAULT).clamp(1, Self::MAX))
    }

    /// The effective limit.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 50)]
    #[case(Some(0), 1)]
    #[case(Some(20), 20)]
    #[case(Some(500), 100)]
    fn page_limits_are_clamped(#[case] requested: Option<usize>, #[case] expected: usize) {
        assert_eq!(PageLimit::clamped(requested).get(), expected);
    }

    #[rstest]
    #[case(NotificationKind::Sold)]
    #[case(NotificationKind::Canceled)]
    #[case(NotificationKind::Community)]
    fn kinds_parse_back_from_storage(#[case] kind: NotificationKind) {
        assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
    }

    #[test]
    fn recorded_notifications_start_unread() {
        let draft = NotificationDraft {
            recipient: UserId::random(),
            kind: NotificationKind::Follow,
            content: "someone followed you".to_owned(),
            related_id: Uuid::new_v4(),
        };
        let notification = Notification::record(NotificationId::random(), draft, Utc::now());
        assert!(!notification.is_read());
        assert!(notification.marked_read().is_read());
    }

    fn chat(sender: UserId, receiver: UserId, content: &str) -> Result<ChatMessage, ChatMessageValidationError> {
        ChatMessage::new(
            ChatMessageId::random(),
            ChatMessageDraft {
                sender_id: sender,
                receiver_id: receiver,
                content: content.to_owned(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn chat_messages_reject_self_addressing_and_blank_text() {
        let user = UserId::random();
        assert_eq!(
            chat(user, user, "hi"),
            Err(ChatMessageValidationError::SelfAddressed)
        );
        assert_eq!(
            chat(user, UserId::random(), "  "),
            Err(ChatMessageValidationError::EmptyContent)
        );
    }

    #[test]
    fn conversation_membership_is_symmetric() {
        let a = UserId::random();
        let b = UserId::random();
        let message = chat(a, b, "is this still available?").expect("valid message");
        assert!(message.is_between(&a, &b));
        assert!(message.is_between(&b, &a));
        assert!(!message.is_between(&a, &UserId::random()));
        assert_eq!(message.peer_of(&a), Some(b));
        assert_eq!(message.peer_of(&b), Some(a));
        assert_eq!(message.peer_of(&UserId::random()), None);
    }
}
