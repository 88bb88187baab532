//! Observable session state types.
//!
//! The subset of session state the presentation layer renders: lifecycle
//! phase, role, transcript entries, and media flags. These are plain data;
//! all mutation goes through the [`crate::Session`] state machine.

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No room open. All handles absent, transcript empty.
    Idle,
    /// Room open, waiting for the other party (or for establishment to
    /// complete).
    Waiting,
    /// Both the call stream and the chat channel are live.
    Connected,
}

/// Which side of the room this peer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Generated the room code and owns it as signaling identity.
    Host,
    /// Dialed someone else's room code under an ephemeral identity.
    Guest,
}

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Typed on this side.
    Local,
    /// Received from the remote party.
    Remote,
    /// Produced by the session itself (status notices).
    System,
}

/// One line of the chat transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Message text.
    pub text: String,
    /// Who produced it.
    pub origin: Origin,
}

impl ChatEntry {
    /// A locally-sent message.
    pub fn local(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::Local }
    }

    /// A message received from the peer.
    pub fn remote(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::Remote }
    }

    /// A session status notice.
    pub fn system(text: impl Into<String>) -> Self {
        Self { text: text.into(), origin: Origin::System }
    }
}

/// Local media toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFlags {
    /// Microphone track enabled.
    pub audio_enabled: bool,
    /// Video track enabled.
    pub video_enabled: bool,
    /// The outgoing video source is a screen capture, not the camera.
    pub screen_sharing: bool,
}

impl Default for MediaFlags {
    fn default() -> Self {
        Self { audio_enabled: true, video_enabled: true, screen_sharing: false }
    }
}
