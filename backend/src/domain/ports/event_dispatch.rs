//! Driving port for raising notifications.
//!
//! Subsystems that produce events (transactions, likes, follows,
//! communities) hand them to this port, which stores them and then makes a
//! best-effort push to the recipient.

use async_trait::async_trait;

use crate::domain::{ChatMessage, ChatMessageDraft, DomainEvent, Error, Notification};

/// Outcome of the real-time half of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the recipient's live connection.
    Pushed,
    /// The recipient had no live connection.
    Offline,
    /// The write failed; the connection was closed and unregistered.
    Dropped,
}

/// A stored record together with how its push went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt<T> {
    /// The persisted record.
    pub record: T,
    /// What happened to the push.
    pub delivery: Delivery,
}

/// Persist-then-push entry point for events and chat messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventDispatch: Send + Sync {
    /// Store the notification for `event`, then push it if the recipient is
    /// connected. Fails only when storing fails.
    async fn dispatch(&self, event: DomainEvent) -> Result<DispatchReceipt<Notification>, Error>;

    /// Store a chat message, then push it if the receiver is connected.
    async fn dispatch_chat(
        &self,
        draft: ChatMessageDraft,
    ) -> Result<DispatchReceipt<ChatMessage>, Error>;
}
