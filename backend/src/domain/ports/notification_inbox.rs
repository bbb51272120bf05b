//! Driving port for reading a user's notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, PageLimit, UserId};

/// Per-user notification feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// Newest-first notifications for `user_id`.
    async fn list(&self, user_id: &UserId, limit: PageLimit) -> Result<Vec<Notification>, Error>;

    /// Mark one of the user's notifications as read.
    async fn mark_read(&self, user_id: &UserId, notification_id: &NotificationId) -> Result<(), Error>;
}
