//! Session input events.
//!
//! This module defines [`SessionEvent`], the full set of inputs that drive
//! the [`crate::Session`] state machine.
//!
//! Events originate from three sources:
//! - Local user actions (create/join/end, chat input, media toggles).
//! - Driver completions for previously issued actions (media acquisition,
//!   signaling registration, scheduled dial timers).
//! - The signaling/transport substrate (incoming calls and channels, call
//!   streams, data payloads, channel closure).
//!
//! Generic over `I` (instant type) so the same machine runs against real and
//! virtual clocks.

use bytes::Bytes;
use ghostwire_core::{MediaError, SignalingError};

use crate::handle::{CallId, ChannelId, RemoteStreamId, StreamHandle, TrackId};

/// Events processed by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent<I = std::time::Instant> {
    /// User wants to create (and host) a new room.
    CreateRoom,

    /// User submitted a room code to join.
    JoinRoom {
        /// Raw user input; normalized and validated by the session.
        code: String,
    },

    /// User ended the call.
    EndCall,

    /// User submitted chat input.
    SendMessage {
        /// Raw input; trimmed before sending, dropped if empty.
        text: String,
    },

    /// The local chat input changed while editing (drives the remote
    /// typing indicator). One event per change; no coalescing.
    InputChanged,

    /// User toggled the microphone.
    ToggleMute,

    /// User toggled the camera.
    ToggleCamera,

    /// User started screen sharing.
    StartScreenShare,

    /// User stopped screen sharing from inside the application.
    StopScreenShare,

    /// Camera+microphone acquisition completed.
    MediaAcquired {
        /// The acquired local stream.
        stream: StreamHandle,
    },

    /// Camera+microphone acquisition failed (consent or device failure).
    MediaFailed {
        /// What went wrong.
        error: MediaError,
    },

    /// Screen capture acquisition completed.
    ScreenAcquired {
        /// The screen video track.
        track: TrackId,
    },

    /// Screen capture acquisition failed. Non-fatal to the call.
    ScreenFailed {
        /// What went wrong.
        error: MediaError,
    },

    /// Camera video reacquired while reversing a screen share.
    CameraRestored {
        /// The fresh camera track.
        track: TrackId,
    },

    /// The screen track ended outside the application (native "stop
    /// sharing" control). Triggers the same reversal as
    /// [`SessionEvent::StopScreenShare`].
    ScreenTrackEnded,

    /// The broker confirmed our identity registration.
    SignalingOpen,

    /// Identity registration failed, or the signaling connection broke.
    SignalingFailed {
        /// What went wrong.
        error: SignalingError,
    },

    /// A remote peer is calling our identity.
    IncomingCall {
        /// The inbound call, to be answered with the local stream.
        call: CallId,
    },

    /// A remote peer opened a chat transport toward our identity.
    IncomingChannel {
        /// The inbound channel. Usable once
        /// [`SessionEvent::ChannelOpen`] fires for it.
        channel: ChannelId,
    },

    /// A scheduled dial timer elapsed.
    DialElapsed,

    /// The current dial attempt failed.
    ///
    /// The driver has already discarded the attempt's call/channel objects;
    /// the session decides whether to retry.
    DialFailed {
        /// Why the attempt failed.
        reason: DialFailure,
    },

    /// The call's remote media stream arrived.
    CallStream {
        /// The call carrying the stream.
        call: CallId,
        /// The remote stream to attach.
        remote: RemoteStreamId,
    },

    /// The chat channel is open and ready to carry frames.
    ChannelOpen {
        /// The now-usable channel.
        channel: ChannelId,
    },

    /// The chat channel closed (remote party left).
    ChannelClosed,

    /// A payload arrived on the chat channel.
    DataReceived {
        /// Raw frame bytes.
        payload: Bytes,
    },

    /// Periodic tick for deadline processing (typing-window expiry).
    Tick {
        /// Current time from the environment.
        now: I,
    },
}

/// Why a dial attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialFailure {
    /// The broker does not know the dialed identity.
    ///
    /// Either the code is wrong, or the host's registration has not
    /// propagated yet; retried until attempts are exhausted.
    UnknownIdentity,

    /// Transport-level failure reaching the peer.
    Transport(String),
}
