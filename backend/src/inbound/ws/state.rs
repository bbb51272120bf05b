//! Shared WebSocket adapter state.

use std::sync::Arc;

use url::{Origin, Url};

use crate::domain::ConnectionRegistry;

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    /// Live connections, shared with the notification dispatcher.
    pub registry: Arc<ConnectionRegistry>,
    allowed_origins: Arc<[Origin]>,
}

impl WsState {
    /// Build state from the registry and the configured origin allow-list.
    ///
    /// Entries that do not parse as URLs are skipped.
    pub fn new<I, S>(registry: Arc<ConnectionRegistry>, allowed_origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_origins = allowed_origins
            .into_iter()
            .filter_map(|raw| Url::parse(raw.as_ref().trim()).ok())
            .map(|url| url.origin())
            .filter(Origin::is_tuple)
            .collect();
        Self {
            registry,
            allowed_origins,
        }
    }

    /// Whether `origin` exactly matches an allowed scheme, host, and port.
    pub fn allows(&self, origin: &Url) -> bool {
        let origin = origin.origin();
        self.allowed_origins.iter().any(|allowed| *allowed == origin)
    }
}
