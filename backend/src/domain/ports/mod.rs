//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod chat_message_repository;
mod chat_messaging;
mod community_post_repository;
mod engagement;
mod event_dispatch;
mod identity_verifier;
mod notification_inbox;
mod notification_repository;
mod push_channel;
mod transaction_command;
mod transaction_repository;

#[cfg(test)]
pub use chat_message_repository::MockChatMessageRepository;
pub use chat_message_repository::{ChatMessageRepository, ChatMessageRepositoryError};
#[cfg(test)]
pub use chat_messaging::MockChatMessaging;
pub use chat_messaging::ChatMessaging;
#[cfg(test)]
pub use community_post_repository::MockCommunityPostRepository;
pub use community_post_repository::{CommunityPostRepository, CommunityPostRepositoryError};
#[cfg(test)]
pub use engagement::MockEngagement;
pub use engagement::{
    CommunityPostRequest, Engagement, FollowRequest, ItemCommentRequest, ItemReactionRequest,
};
#[cfg(test)]
pub use event_dispatch::MockEventDispatch;
pub use event_dispatch::{Delivery, DispatchReceipt, EventDispatch};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{
    FIXTURE_TOKEN_PREFIX, FixtureIdentityVerifier, IdentityVerificationError, IdentityVerifier,
};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use push_channel::MockPushChannel;
pub use push_channel::{DisconnectReason, PushChannel, PushChannelError};
#[cfg(test)]
pub use transaction_command::{MockTransactionCommand, MockTransactionQuery};
pub use transaction_command::{
    CreatePurchaseRequest, ListTransactionsRequest, PostReviewRequest, TransactionActionRequest,
    TransactionCommand, TransactionQuery,
};
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
pub use transaction_repository::{
    ItemEffect, PurchaseRecord, StatusTransition, TransactionRepository,
    TransactionRepositoryError,
};
