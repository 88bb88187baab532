//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the session runtime from the transport
//! library, device capture, audio cues, and rendering. Each frontend
//! implements it; the generic [`crate::Runtime`] handles orchestration, so
//! the same session logic runs in production and in deterministic tests.

use std::future::Future;

use ghostwire_core::env::Environment;

use crate::action::SessionAction;
use crate::event::SessionEvent;
use crate::session::Session;

/// Abstracts platform I/O for the session runtime.
///
/// # Responsibilities
///
/// - Translate [`SessionAction`]s into calls on the peer-connection library,
///   capture devices, clipboard/audio facilities.
/// - Surface completions, signaling callbacks, data payloads, and user input
///   as [`SessionEvent`]s from `poll_event`.
/// - Assign and track the opaque ids carried by events and actions.
///
/// # Contract
///
/// - Resource-releasing actions (`ReleaseMedia`, `StopTrack`, `CloseCall`,
///   `CloseChannel`, `CloseSignaling`) must be safe no-ops when the resource
///   is absent or already released.
/// - `ScheduleDial { delay }` must fire a single
///   [`SessionEvent::DialElapsed`] after sleeping `delay` (via
///   [`Environment::sleep`] so tests can run on a virtual clock).
/// - Screen tracks must have their end-of-stream callback wired to
///   [`SessionEvent::ScreenTrackEnded`].
pub trait Driver<E: Environment>: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next event.
    ///
    /// Returns `None` when the event source has closed and the runtime
    /// should stop.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<SessionEvent<E::Instant>>, Self::Error>> + Send;

    /// Execute one action.
    ///
    /// # Errors
    ///
    /// Returns an error only for platform faults (e.g. the UI is gone);
    /// expected failures of the action itself come back as events.
    fn apply(&mut self, action: SessionAction)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Render the session state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, session: &Session<E>) -> Result<(), Self::Error>;

    /// Release platform resources on shutdown.
    fn stop(&mut self);
}
