//! Driven port for the append-only notification log.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Notification, NotificationId, PageLimit, UserId};

define_port_error! {
    /// Errors raised when persisting notifications.
    pub enum NotificationRepositoryError {
        Connection { message: String } => "notification store connection failed: {message}",
        Query { message: String } => "notification store query failed: {message}",
    }
}

/// Append-only notification persistence keyed by recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification. Concurrent appends never overwrite each other.
    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Newest-first page of a user's notifications, ties broken by id.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Set the read flag on a notification owned by `user_id`.
    ///
    /// Returns `false` when no such notification exists for that user.
    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError>;
}
