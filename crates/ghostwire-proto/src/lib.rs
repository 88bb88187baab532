//! Ghostwire chat side-channel wire protocol.
//!
//! Defines the framing used over the peer-to-peer data channel: a frame is
//! either an opaque chat message or the reserved typing-indicator control
//! token. The data channel itself (ordered, reliable delivery) is provided by
//! the transport layer; this crate only interprets payload bytes.
//!
//! # Components
//!
//! - [`ChatFrame`]: decoded frame (message vs. typing control)
//! - [`sendable`]: input normalization for outbound messages
//! - [`ProtocolError`]: decode failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod frame;

pub use error::ProtocolError;
pub use frame::{ChatFrame, TYPING_TOKEN, sendable};
