//! Driven port for direct chat messages.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ChatMessage, PageLimit, UserId};

define_port_error! {
    /// Errors raised when persisting chat messages.
    pub enum ChatMessageRepositoryError {
        Connection { message: String } => "chat store connection failed: {message}",
        Query { message: String } => "chat store query failed: {message}",
    }
}

/// Chat message persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Store a message.
    async fn append(&self, message: &ChatMessage) -> Result<(), ChatMessageRepositoryError>;

    /// The most recent `limit` messages exchanged between two users, oldest
    /// first.
    async fn conversation(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError>;

    /// The latest message of each conversation `user_id` takes part in,
    /// newest first, at most `limit` conversations.
    async fn latest_per_peer(
        &self,
        user_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<ChatMessage>, ChatMessageRepositoryError>;
}
