//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ChatMessaging, Engagement, IdentityVerifier, NotificationInbox, TransactionCommand,
    TransactionQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Exchanges identity tokens for user ids at login.
    pub identity: Arc<dyn IdentityVerifier>,
    /// Purchase lifecycle commands.
    pub transactions: Arc<dyn TransactionCommand>,
    /// Transaction lookups.
    pub transactions_query: Arc<dyn TransactionQuery>,
    /// Per-user notification log.
    pub inbox: Arc<dyn NotificationInbox>,
    /// Direct messages.
    pub chat: Arc<dyn ChatMessaging>,
    /// Likes, comments, follows, and community posts.
    pub engagement: Arc<dyn Engagement>,
}

impl HttpState {
    /// Bundle the ports.
    ///
    /// # Examples
    /// ```ignore
    /// let service = Arc::new(TransactionService::new(repo, dispatcher.clone(), clock));
    /// let state = HttpState::new(HttpStatePorts {
    ///     identity: Arc::new(FixtureIdentityVerifier),
    ///     transactions: service.clone(),
    ///     transactions_query: service,
    ///     inbox,
    ///     chat,
    ///     engagement,
    /// });
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            transactions,
            transactions_query,
            inbox,
            chat,
            engagement,
        } = ports;
        Self {
            identity,
            transactions,
            transactions_query,
            inbox,
            chat,
            engagement,
        }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// See [`HttpState::identity`].
    pub identity: Arc<dyn IdentityVerifier>,
    /// See [`HttpState::transactions`].
    pub transactions: Arc<dyn TransactionCommand>,
    /// See [`HttpState::transactions_query`].
    pub transactions_query: Arc<dyn TransactionQuery>,
    /// See [`HttpState::inbox`].
    pub inbox: Arc<dyn NotificationInbox>,
    /// See [`HttpState::chat`].
    pub chat: Arc<dyn ChatMessaging>,
    /// See [`HttpState::engagement`].
    pub engagement: Arc<dyn Engagement>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
