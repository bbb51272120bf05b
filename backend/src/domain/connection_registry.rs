//! Directory of live push connections, one per user.
//!
//! A single mutex guards the map. No I/O happens while the guard is held:
//! callers get cloned handles back and write or close them afterwards.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::UserId;
use super::ports::PushChannel;
use crate::domain::ConnectionId;

/// Shared handle to a live connection.
pub type SharedPushChannel = Arc<dyn PushChannel>;

/// In-memory map from user id to that user's live connection.
///
/// Shared via `Arc` between the WebSocket accept path, which registers and
/// unregisters, and the dispatcher, which looks connections up.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<UserId, SharedPushChannel>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `channel` as the live connection for `user_id`.
    ///
    /// Any existing connection is displaced and returned so the caller can
    /// close it.
    pub fn register(&self, user_id: UserId, channel: SharedPushChannel) -> Option<SharedPushChannel> {
        self.guard().insert(user_id, channel)
    }

    /// Remove the entry for `user_id` only if it is still `connection_id`.
    ///
    /// Returns whether an entry was removed. A stale connection closing after
    /// its replacement registered leaves the replacement in place.
    pub fn unregister(&self, user_id: &UserId, connection_id: ConnectionId) -> bool {
        let mut connections = self.guard();
        let is_current = connections
            .get(user_id)
            .is_some_and(|channel| channel.id() == connection_id);
        if is_current {
            connections.remove(user_id);
        }
        is_current
    }

    /// Live connection for `user_id`, if any.
    #[must_use]
    pub fn lookup(&self, user_id: &UserId) -> Option<SharedPushChannel> {
        self.guard().get(user_id).cloned()
    }

    /// Number of users currently connected.
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.guard().len()
    }

    // Every mutation is a single map call, so a panic elsewhere cannot leave
    // the map half-updated and the poisoned guard is safe to reuse.
    fn guard(&self) -> MutexGuard<'_, HashMap<UserId, SharedPushChannel>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connected", &self.connected_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "connection_registry_tests.rs"]
mod tests;
