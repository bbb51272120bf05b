//! Domain primitives, the purchase state machine, social engagement, and
//! notification delivery.
//!
//! Purpose: define strongly typed entities and the services that drive them.
//! Nothing here depends on actix or Diesel; adapters reach the domain
//! through the traits in [`ports`].

pub mod connection_registry;
pub mod engagement;
pub mod engagement_service;
pub mod error;
pub mod events;
pub mod ids;
pub mod item;
pub mod notification;
pub mod notification_dispatcher;
pub mod notification_service;
pub mod ports;
pub mod review;
#[cfg(test)]
pub(crate) mod test_doubles;
pub mod trace_id;
pub mod transaction;
pub mod transaction_service;

pub use self::connection_registry::{ConnectionRegistry, SharedPushChannel};
pub use self::engagement::{
    COMMUNITY_FANOUT, COMMUNITY_POST_MAX, CommunityPost, CommunityPostDraft,
    EngagementValidationError, ITEM_COMMENT_MAX,
};
pub use self::engagement_service::EngagementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::DomainEvent;
pub use self::ids::{
    ChatMessageId, CommunityId, CommunityPostId, ConnectionId, InvalidIdError, ItemId,
    NotificationId, ReviewId, TransactionId, UserId,
};
pub use self::item::{
    ITEM_TITLE_MAX, Item, ItemDraft, ItemStatus, ItemValidationError, Price, UnknownStatusError,
};
pub use self::notification::{
    CHAT_MESSAGE_MAX, ChatMessage, ChatMessageDraft, ChatMessageValidationError, ChatThread,
    Notification, NotificationDraft, NotificationKind, PageLimit, PushPayload,
};
pub use self::notification_dispatcher::NotificationDispatcher;
pub use self::notification_service::{ChatService, NotificationService};
pub use self::review::{
    REVIEW_COMMENT_MAX, Rating, Review, ReviewDraft, ReviewRole, ReviewValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::transaction::{
    CompletionStatus, PAYMENT_REFERENCE_MAX, Transaction, TransactionDetail, TransactionDraft,
    TransactionScope, TransactionStatus, TransitionError,
};
pub use self::transaction_service::TransactionService;
