//! Shared doubles for domain unit tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use super::ports::{DisconnectReason, PushChannel, PushChannelError};
use super::{ConnectionId, PushPayload};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock that advances one second every time it is read.
pub(crate) struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub(crate) fn shared() -> Arc<dyn Clock> {
        Arc::new(Self {
            start: fixture_timestamp(),
            ticks: AtomicI64::new(0),
        })
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + TimeDelta::seconds(tick)
    }
}

/// Push channel that records payloads and can be told to fail.
pub(crate) struct RecordingChannel {
    id: ConnectionId,
    fail: AtomicBool,
    closed: Mutex<Option<DisconnectReason>>,
    pushed: Mutex<Vec<PushPayload>>,
}

impl RecordingChannel {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::random(),
            fail: AtomicBool::new(false),
            closed: Mutex::new(None),
            pushed: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        let channel = Self::new();
        channel.fail.store(true, Ordering::SeqCst);
        channel
    }

    pub(crate) fn pushed(&self) -> Vec<PushPayload> {
        self.pushed.lock().expect("recording lock").clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.close_reason().is_some()
    }

    pub(crate) fn close_reason(&self) -> Option<DisconnectReason> {
        *self.closed.lock().expect("recording lock")
    }
}

#[async_trait]
impl PushChannel for RecordingChannel {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn push(&self, payload: &PushPayload) -> Result<(), PushChannelError> {
        if self.fail.load(Ordering::SeqCst) || self.is_closed() {
            return Err(PushChannelError::closed("peer went away"));
        }
        self.pushed
            .lock()
            .expect("recording lock")
            .push(payload.clone());
        Ok(())
    }

    async fn close(&self, reason: DisconnectReason) {
        self.closed
            .lock()
            .expect("recording lock")
            .get_or_insert(reason);
    }
}
