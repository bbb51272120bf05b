//! Read side of the notification log and chat history.

use std::sync::Arc;

use async_trait::async_trait;

use super::notification_dispatcher::{map_chat_error, map_notification_error};
use super::ports::{
    ChatMessageRepository, ChatMessaging, EventDispatch, NotificationInbox, NotificationRepository,
};
use super::{
    ChatMessage, ChatMessageDraft, ChatThread, Error, Notification, NotificationId, PageLimit,
    UserId,
};

/// Serves a user's notification feed.
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N>
where
    N: NotificationRepository,
{
    /// Create a service over the notification store.
    pub const fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationInbox for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, user_id: &UserId, limit: PageLimit) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for_user(user_id, limit)
            .await
            .map_err(map_notification_error)
    }

    async fn mark_read(&self, user_id: &UserId, notification_id: &NotificationId) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(user_id, notification_id)
            .await
            .map_err(map_notification_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!("notification {notification_id} not found")))
        }
    }
}

/// Sends direct messages through the dispatcher and serves history.
#[derive(Clone)]
pub struct ChatService<C> {
    messages: Arc<C>,
    dispatcher: Arc<dyn EventDispatch>,
}

impl<C> ChatService<C>
where
    C: ChatMessageRepository,
{
    /// Create a service over the chat store and dispatcher.
    pub fn new(messages: Arc<C>, dispatcher: Arc<dyn EventDispatch>) -> Self {
        Self {
            messages,
            dispatcher,
        }
    }
}

#[async_trait]
impl<C> ChatMessaging for ChatService<C>
where
    C: ChatMessageRepository,
{
    async fn send(&self, draft: ChatMessageDraft) -> Result<ChatMessage, Error> {
        self.dispatcher
            .dispatch_chat(draft)
            .await
            .map(|receipt| receipt.record)
    }

    async fn history(
        &self,
        user_id: &UserId,
        peer_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, Error> {
        self.messages
            .conversation(user_id, peer_id, limit)
            .await
            .map_err(map_chat_error)
    }

    async fn threads(&self, user_id: &UserId, limit: PageLimit) -> Result<Vec<ChatThread>, Error> {
        let latest = self
            .messages
            .latest_per_peer(user_id, limit)
            .await
            .map_err(map_chat_error)?;
        Ok(latest
            .into_iter()
            .filter_map(|message| {
                message.peer_of(user_id).map(|peer_id| ChatThread {
                    peer_id,
                    last_message: message,
                })
            })
            .collect())
    }
}
