//! Shared test support: deterministic environment and session fixtures.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use ghostwire_core::env::Environment;

use crate::event::SessionEvent;
use crate::handle::{StreamHandle, TrackId};
use crate::session::Session;

/// Deterministic environment: fixed clock, counter entropy.
#[derive(Clone)]
pub(crate) struct TestEnv {
    start: std::time::Instant,
    entropy: Arc<AtomicU64>,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        Self { start: std::time::Instant::now(), entropy: Arc::new(AtomicU64::new(0)) }
    }
}

impl Environment for TestEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> std::time::Instant {
        self.start
    }

    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = (self.entropy.fetch_add(1, Ordering::SeqCst) % 251) as u8;
        }
    }
}

/// Drive a fresh session to Waiting(Host) with media and signaling up.
/// Returns the local stream handle in use.
pub(crate) fn host_to_waiting(session: &mut Session<TestEnv>) -> StreamHandle {
    let stream = StreamHandle::new(TrackId(1), TrackId(2));
    let _ = session.handle(SessionEvent::CreateRoom);
    let _ = session.handle(SessionEvent::MediaAcquired { stream });
    let _ = session.handle(SessionEvent::SignalingOpen);
    stream
}
