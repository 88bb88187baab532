//! Chat frame encoding and decoding.
//!
//! A frame on the wire is a UTF-8 string: either the reserved typing control
//! token or an opaque chat message. There is no header; the data channel
//! already provides message boundaries and ordered, reliable delivery.
//!
//! # Invariants
//!
//! - The token string [`TYPING_TOKEN`] is reserved: a payload exactly equal
//!   to it always decodes as [`ChatFrame::Typing`]. A user message with that
//!   literal text is indistinguishable on the wire and therefore cannot be
//!   sent as a message.
//! - Typing frames carry no payload beyond the token and never contribute to
//!   the transcript.

use bytes::Bytes;

use crate::error::ProtocolError;

/// Reserved control token signaling "typing now".
///
/// Receipt resets the remote typing-visible window; it is never displayed.
pub const TYPING_TOKEN: &str = "__TYPING__";

/// A decoded data-channel frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFrame {
    /// Opaque chat message text.
    Message(String),

    /// Typing-indicator control frame.
    Typing,
}

impl ChatFrame {
    /// Encode this frame to wire bytes.
    pub fn encode(&self) -> Bytes {
        match self {
            Self::Message(text) => Bytes::copy_from_slice(text.as_bytes()),
            Self::Typing => Bytes::from_static(TYPING_TOKEN.as_bytes()),
        }
    }

    /// Decode wire bytes into a frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidUtf8`] if the payload is not text.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| ProtocolError::InvalidUtf8 { offset: e.valid_up_to() })?;

        if text == TYPING_TOKEN {
            Ok(Self::Typing)
        } else {
            Ok(Self::Message(text.to_string()))
        }
    }
}

/// Normalize user input into sendable message text.
///
/// Trims leading and trailing whitespace. Returns `None` when nothing
/// remains: empty-after-trim input must never be transmitted or echoed.
pub fn sendable(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roundtrip() {
        let frame = ChatFrame::Message("hello".to_string());
        let decoded = ChatFrame::decode(&frame.encode());
        assert_eq!(decoded, Ok(frame));
    }

    #[test]
    fn typing_token_decodes_as_control_frame() {
        assert_eq!(ChatFrame::decode(b"__TYPING__"), Ok(ChatFrame::Typing));
    }

    #[test]
    fn typing_encodes_to_reserved_token() {
        assert_eq!(&ChatFrame::Typing.encode()[..], TYPING_TOKEN.as_bytes());
    }

    #[test]
    fn message_equal_to_token_is_reserved() {
        // The wire cannot distinguish this from a control frame.
        let frame = ChatFrame::Message(TYPING_TOKEN.to_string());
        assert_eq!(ChatFrame::decode(&frame.encode()), Ok(ChatFrame::Typing));
    }

    #[test]
    fn non_utf8_payload_is_rejected() {
        let err = ChatFrame::decode(&[b'h', b'i', 0xFF, 0xFE]);
        assert_eq!(err, Err(ProtocolError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn sendable_trims_whitespace() {
        assert_eq!(sendable("  hello world \n"), Some("hello world"));
    }

    #[test]
    fn sendable_rejects_empty_and_whitespace_only() {
        assert_eq!(sendable(""), None);
        assert_eq!(sendable("   \t\n"), None);
    }
}
