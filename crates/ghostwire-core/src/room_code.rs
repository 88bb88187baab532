//! Room codes: short human-shareable identifiers.
//!
//! An 8-character uppercase base-36 string. The code is both the shareable
//! room token and the host's discovery identity on the signaling broker.
//! Guests generate a code of the same shape as their own ephemeral identity.
//!
//! No local uniqueness is enforced; the namespace (36^8) and the narrow
//! window a room stays open make collisions negligible. If one does occur
//! the broker rejects the registration and the session surfaces it as a
//! fatal establishment error.

use std::fmt;

use thiserror::Error;

use crate::env::Environment;

/// Characters a room code is drawn from.
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A validated room code.
///
/// Immutable for the lifetime of the room it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Fixed code length in characters.
    pub const LEN: usize = 8;

    /// Generate a fresh random code.
    pub fn generate<E: Environment>(env: &E) -> Self {
        let mut bytes = [0u8; Self::LEN];
        env.random_bytes(&mut bytes);

        let code = bytes.iter().map(|b| char::from(ALPHABET[usize::from(*b) % ALPHABET.len()]));
        Self(code.collect())
    }

    /// Parse user input into a room code.
    ///
    /// Trims surrounding whitespace and normalizes to uppercase before
    /// validating length and alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`RoomCodeError`] describing the first violation found.
    pub fn parse(input: &str) -> Result<Self, RoomCodeError> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(RoomCodeError::Empty);
        }
        let len = normalized.chars().count();
        if len != Self::LEN {
            return Err(RoomCodeError::WrongLength { len });
        }
        if let Some(ch) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(RoomCodeError::InvalidChar { ch });
        }

        Ok(Self(normalized))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room code validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomCodeError {
    /// Input was empty after trimming.
    #[error("room code is empty")]
    Empty,

    /// Input was not exactly [`RoomCode::LEN`] characters.
    #[error("room code must be {expected} characters, got {len}", expected = RoomCode::LEN)]
    WrongLength {
        /// Character count after trimming.
        len: usize,
    },

    /// Input contained a character outside `0-9A-Z`.
    #[error("room code contains invalid character {ch:?}")]
    InvalidChar {
        /// The offending character (after uppercasing).
        ch: char,
    },
}
