//! In-process notification log.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{Notification, NotificationId, PageLimit, UserId};

/// Notification repository backed by process memory.
#[derive(Default)]
pub struct InMemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationStore {
    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        self.rows.lock().await.push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: PageLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let rows = self.rows.lock().await;
        let mut owned: Vec<Notification> = rows
            .iter()
            .filter(|notification| notification.recipient() == *user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|notification| Reverse((notification.created_at(), notification.id())));
        owned.truncate(limit.get());
        Ok(owned)
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        notification_id: &NotificationId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id() == *notification_id && row.recipient() == *user_id)
        else {
            return Ok(false);
        };
        *row = row.clone().marked_read();
        Ok(true)
    }
}
