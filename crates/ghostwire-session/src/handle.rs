//! Opaque resource handles assigned by the driver.
//!
//! The session layer never touches transport or device objects directly; it
//! refers to them through driver-assigned identifiers. The driver owns the
//! mapping from these ids to live objects (media tracks, call objects, data
//! connections) and is free to forget an id once the session has asked for
//! the resource to be closed.

/// Identifier of a single local media track (audio, camera, or screen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

/// Identifier of an active media call between the two peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(pub u64);

/// Identifier of the chat data channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u64);

/// Identifier of the remote party's incoming media stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoteStreamId(pub u64);

/// The local capture stream: at most one audio and one video track.
///
/// The video slot is hot-swappable: during screen share it holds the screen
/// track instead of the camera track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamHandle {
    /// Microphone track, if the device produced one.
    pub audio: Option<TrackId>,
    /// Camera (or screen) track, if the device produced one.
    pub video: Option<TrackId>,
}

impl StreamHandle {
    /// A stream with both an audio and a video track.
    pub fn new(audio: TrackId, video: TrackId) -> Self {
        Self { audio: Some(audio), video: Some(video) }
    }
}
