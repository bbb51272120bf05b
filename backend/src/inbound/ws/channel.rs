//! `PushChannel` over an open actix-ws session.

use async_trait::async_trait;
use actix_ws::{CloseCode, CloseReason, Session};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{DisconnectReason, PushChannel, PushChannelError};
use crate::domain::{ConnectionId, PushPayload};
use crate::inbound::ws::messages::PushMessage;

/// Registry handle for one WebSocket connection.
///
/// Holds its own clone of the session; the per-connection task keeps another
/// for heartbeats. After [`PushChannel::close`] every push fails with
/// `Closed`.
pub struct WsPushChannel {
    id: ConnectionId,
    session: Mutex<Option<Session>>,
}

impl WsPushChannel {
    /// Wrap `session` under a fresh connection id.
    pub fn new(session: Session) -> Self {
        Self {
            id: ConnectionId::random(),
            session: Mutex::new(Some(session)),
        }
    }
}

/// Close frame sent to the client for `reason`.
fn close_frame(reason: DisconnectReason) -> CloseReason {
    let code = match reason {
        DisconnectReason::Replaced | DisconnectReason::SessionEnded => CloseCode::Normal,
        DisconnectReason::PushFailed => CloseCode::Error,
    };
    CloseReason {
        code,
        description: Some(reason.description().to_owned()),
    }
}

#[async_trait]
impl PushChannel for WsPushChannel {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn push(&self, payload: &PushPayload) -> Result<(), PushChannelError> {
        let body = serde_json::to_string(&PushMessage::from(payload))
            .map_err(|err| PushChannelError::encode(err.to_string()))?;
        let mut guard = self.session.lock().await;
        let session = guard
            .as_mut()
            .ok_or_else(|| PushChannelError::closed("connection already closed"))?;
        session
            .text(body)
            .await
            .map_err(|err| PushChannelError::closed(err.to_string()))
    }

    async fn close(&self, reason: DisconnectReason) {
        let Some(session) = self.session.lock().await.take() else {
            return;
        };
        if let Err(error) = session.close(Some(close_frame(reason))).await {
            debug!(%error, connection_id = %self.id, "session already closed");
        }
    }
}
