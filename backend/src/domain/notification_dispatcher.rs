//! Persist-then-push delivery of notifications and chat messages.
//!
//! Storing the record is the part that must succeed. The push afterwards is
//! best effort: if the recipient is offline nothing happens, and if the write
//! fails the connection is treated as gone, closed, and unregistered. Pushes
//! are never retried or queued; the stored record is the source of truth.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{
    ChatMessageRepository, ChatMessageRepositoryError, Delivery, DisconnectReason, DispatchReceipt,
    EventDispatch, NotificationRepository, NotificationRepositoryError,
};
use super::{
    ChatMessage, ChatMessageDraft, ChatMessageId, ConnectionRegistry, DomainEvent, Error,
    Notification, NotificationId, PushPayload, UserId,
};

/// Dispatches events and chat messages to their recipients.
#[derive(Clone)]
pub struct NotificationDispatcher<N, C> {
    notifications: Arc<N>,
    chat: Arc<C>,
    registry: Arc<ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl<N, C> NotificationDispatcher<N, C>
where
    N: NotificationRepository,
    C: ChatMessageRepository,
{
    /// Create a dispatcher over the given stores and registry.
    pub fn new(
        notifications: Arc<N>,
        chat: Arc<C>,
        registry: Arc<ConnectionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            chat,
            registry,
            clock,
        }
    }

    async fn push(&self, recipient: &UserId, payload: &PushPayload) -> Delivery {
        let Some(channel) = self.registry.lookup(recipient) else {
            debug!(user_id = %recipient, "recipient offline; push skipped");
            return Delivery::Offline;
        };
        match channel.push(payload).await {
            Ok(()) => Delivery::Pushed,
            Err(error) => {
                warn!(
                    user_id = %recipient,
                    connection_id = %channel.id(),
                    %error,
                    "push failed; dropping connection"
                );
                channel.close(DisconnectReason::PushFailed).await;
                self.registry.unregister(recipient, channel.id());
                Delivery::Dropped
            }
        }
    }
}

#[async_trait]
impl<N, C> EventDispatch for NotificationDispatcher<N, C>
where
    N: NotificationRepository,
    C: ChatMessageRepository,
{
    async fn dispatch(&self, event: DomainEvent) -> Result<DispatchReceipt<Notification>, Error> {
        let notification =
            Notification::record(NotificationId::random(), event.into_draft(), self.clock.utc());
        self.notifications
            .append(&notification)
            .await
            .map_err(map_notification_error)?;

        let payload = PushPayload::Notification(notification.clone());
        let delivery = self.push(&notification.recipient(), &payload).await;
        Ok(DispatchReceipt {
            record: notification,
            delivery,
        })
    }

    async fn dispatch_chat(
        &self,
        draft: ChatMessageDraft,
    ) -> Result<DispatchReceipt<ChatMessage>, Error> {
        let message = ChatMessage::new(ChatMessageId::random(), draft, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.chat.append(&message).await.map_err(map_chat_error)?;

        let payload = PushPayload::ChatMessage(message.clone());
        let delivery = self.push(&message.receiver_id(), &payload).await;
        Ok(DispatchReceipt {
            record: message,
            delivery,
        })
    }
}

pub(crate) fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}

pub(crate) fn map_chat_error(error: ChatMessageRepositoryError) -> Error {
    match error {
        ChatMessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("chat store unavailable: {message}"))
        }
        ChatMessageRepositoryError::Query { message } => {
            Error::internal(format!("chat store error: {message}"))
        }
    }
}

#[cfg(test)]
#[path = "notification_dispatcher_tests.rs"]
mod tests;
