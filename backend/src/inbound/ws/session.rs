//! Per-connection WebSocket task.
//!
//! Registers the connection for its user, keeps it alive with heartbeats,
//! and unregisters it on exit. The public contract pings every 5s and treats
//! a client as gone after 10s without traffic; tests shorten both.
//!
//! Pushes never pass through this task: the dispatcher writes to the
//! registered [`WsPushChannel`] directly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::ports::{DisconnectReason, PushChannel};
use crate::domain::{ConnectionId, ConnectionRegistry, UserId};
use crate::inbound::ws::channel::WsPushChannel;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    registry: Arc<ConnectionRegistry>,
    user_id: UserId,
    session: Session,
    stream: MessageStream,
) {
    let channel = Arc::new(WsPushChannel::new(session.clone()));
    let connection_id = channel.id();
    if let Some(displaced) = registry.register(user_id, channel.clone()) {
        info!(%user_id, replaced = %displaced.id(), "newer session displaces older connection");
        displaced.close(DisconnectReason::Replaced).await;
    }
    info!(%user_id, %connection_id, "push connection registered");

    WsSession {
        user_id,
        connection_id,
    }
    .run(session, stream)
    .await;

    let removed = registry.unregister(&user_id, connection_id);
    channel.close(DisconnectReason::SessionEnded).await;
    info!(%user_id, %connection_id, removed, "push connection closed");
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    user_id: UserId,
    connection_id: ConnectionId,
}

impl WsSession {
    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                Self::close_session_if_needed(session, Self::close_action_for(&error)).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };
        let message = message.map_err(SessionError::Protocol)?;

        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Message::Text(_) | Message::Binary(_) => {
                // The channel is push-only; client frames only prove liveness.
                *last_heartbeat = Instant::now();
                debug!(connection_id = %self.connection_id, "ignoring client data frame");
                Ok(())
            }
            Message::Pong(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        let user_id = self.user_id;
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(%user_id, "WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(%user_id, error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                debug!(%user_id, error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                debug!(error = %error, "WebSocket session already closed");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
