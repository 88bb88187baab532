//! Protocol error types.
//!
//! Decode failures only. Encoding is infallible: every [`crate::ChatFrame`]
//! has a valid wire representation.

use thiserror::Error;

/// Errors produced while decoding data-channel payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload bytes are not valid UTF-8.
    ///
    /// The chat protocol carries text frames only; any non-text payload is a
    /// peer bug and the frame is dropped by the caller.
    #[error("frame payload is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offset() {
        let err = ProtocolError::InvalidUtf8 { offset: 7 };
        assert!(err.to_string().contains("offset 7"));
    }
}
