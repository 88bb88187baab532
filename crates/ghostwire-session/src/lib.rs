//! Session orchestration for Ghostwire.
//!
//! A one-to-one, ephemeral audio/video call with a chat side-channel,
//! identified by a short room code. This crate is the orchestration layer:
//! it coordinates signaling events, inbound call events, data-channel events
//! and local user actions into one consistent session state, with no
//! server-side authority to resolve races.
//!
//! Everything is sans-IO and action-based: the [`Session`] state machine
//! consumes [`SessionEvent`] inputs and produces [`SessionAction`]
//! instructions for a [`Driver`] to execute against the real transport,
//! devices, and UI. The same state machine runs unchanged under a
//! deterministic test driver.
//!
//! # Components
//!
//! - [`Session`]: the session lifecycle state machine (Idle → Waiting →
//!   Connected → Idle)
//! - [`MediaSources`]: local capture stream bookkeeping (mute, camera
//!   toggle, screen-share substitution)
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod driver;
mod event;
mod handle;
mod media;
mod runtime;
mod session;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use action::{Cue, SessionAction};
pub use config::SignalingConfig;
pub use driver::Driver;
pub use event::{DialFailure, SessionEvent};
pub use handle::{CallId, ChannelId, RemoteStreamId, StreamHandle, TrackId};
pub use media::{MediaConstraints, MediaSources};
pub use runtime::Runtime;
pub use session::{DIAL_GRACE, MAX_DIAL_ATTEMPTS, SECURE_NOTICE, Session, TYPING_WINDOW};
pub use state::{ChatEntry, MediaFlags, Origin, Phase, Role};

pub use ghostwire_core::{
    MediaError, RoomCode, RoomCodeError, SessionError, SignalingError, env::Environment,
};
