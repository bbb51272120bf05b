//! Driving port for direct messages between users.

use async_trait::async_trait;

use crate::domain::{ChatMessage, ChatMessageDraft, ChatThread, Error, PageLimit, UserId};

/// Send and read direct messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatMessaging: Send + Sync {
    /// Store a message and push it to the receiver if connected.
    async fn send(&self, draft: ChatMessageDraft) -> Result<ChatMessage, Error>;

    /// Oldest-first conversation between the caller and a peer.
    async fn history(
        &self,
        user_id: &UserId,
        peer_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, Error>;

    /// One entry per peer the caller has exchanged messages with, ordered
    /// by the latest message, newest first.
    async fn threads(&self, user_id: &UserId, limit: PageLimit) -> Result<Vec<ChatThread>, Error>;
}
