//! Core types for Ghostwire.
//!
//! Leaf utilities shared by the session layer and its drivers:
//!
//! - [`env::Environment`]: time/randomness abstraction for deterministic tests
//! - [`RoomCode`]: short shareable identifier doubling as the host's
//!   discovery identity
//! - [`link`]: shareable-link construction and `?room=` prefill parsing
//! - [`SessionError`]: the error taxonomy for session establishment and media

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod link;

mod error;
mod room_code;

pub use error::{MediaError, SessionError, SignalingError};
pub use room_code::{RoomCode, RoomCodeError};
