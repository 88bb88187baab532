//! Error taxonomy for session establishment and media.
//!
//! Strongly-typed errors per failure class: device consent, signaling
//! establishment, and dialing. Every establishment-path error is caught at
//! the failing operation and resolved locally into a teardown plus a single
//! user notification; none propagate as unhandled faults.

use thiserror::Error;

use crate::room_code::RoomCodeError;

/// Device capture failures.
///
/// Consent failures are user decisions, not transient conditions: the
/// session never retries them on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// Camera/microphone (or screen) permission was denied.
    #[error("camera and microphone access was denied")]
    PermissionDenied,

    /// No usable capture device.
    #[error("no usable camera or microphone was found")]
    DeviceUnavailable,

    /// Screen capture is not available in this environment.
    #[error("screen sharing is not available")]
    NotAvailable,
}

/// Signaling broker failures during identity registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalingError {
    /// Another peer is already registered under this identity.
    ///
    /// For a host this is a room-code collision; fatal either way.
    #[error("identity {0:?} is already taken on the signaling broker")]
    IdentityTaken(String),

    /// The broker could not be reached.
    #[error("signaling broker unreachable: {0}")]
    BrokerUnreachable(String),
}

/// Top-level session error.
///
/// Carried in user notifications and logged; the session state machine
/// already performed the corresponding teardown (or, for non-fatal errors,
/// left the session untouched) by the time one of these surfaces.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Device capture failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Identity registration failed.
    #[error(transparent)]
    Signaling(#[from] SignalingError),

    /// The submitted room code is malformed.
    #[error(transparent)]
    RoomCode(#[from] RoomCodeError),

    /// The broker reported the dialed identity as unknown.
    #[error("no one answered at {code}; the room code may be wrong")]
    PeerUnreachable {
        /// The code that was dialed.
        code: String,
    },

    /// Dialing never succeeded within the bounded retry loop.
    #[error("could not reach the room after {attempts} attempts")]
    DialTimeout {
        /// How many dials were made before giving up.
        attempts: u32,
    },
}

impl SessionError {
    /// Returns true if this error forces a full session teardown.
    ///
    /// Non-fatal cases leave the session running: a malformed code is
    /// rejected before anything is established, and a failed screen-share
    /// only cancels that action.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::RoomCode(_) | Self::Media(MediaError::NotAvailable))
    }
}
