//! Driven port for a live duplex connection to one user.
//!
//! The WebSocket adapter implements this over an open session; tests use
//! recording doubles. Implementations must tolerate `push` after `close`
//! by returning an error rather than panicking.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ConnectionId, PushPayload};

define_port_error! {
    /// Errors raised while writing to a live connection.
    pub enum PushChannelError {
        Closed { message: String } => "push channel closed: {message}",
        Encode { message: String } => "failed to encode push payload: {message}",
    }
}

/// Why a connection is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// A newer connection for the same user took over.
    Replaced,
    /// Writing a push failed.
    PushFailed,
    /// The connection's own session loop finished.
    SessionEnded,
}

impl DisconnectReason {
    /// Short description suitable for a close frame.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Replaced => "session replaced",
            Self::PushFailed => "push failed",
            Self::SessionEnded => "session ended",
        }
    }
}

/// A single live connection that payloads can be written to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Identity of this connection, distinct from every other connection.
    fn id(&self) -> ConnectionId;

    /// Write a payload to the connection.
    async fn push(&self, payload: &PushPayload) -> Result<(), PushChannelError>;

    /// Close the connection, telling the peer why. Errors are swallowed;
    /// the peer may already be gone.
    async fn close(&self, reason: DisconnectReason);
}
