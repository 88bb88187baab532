//! Session side-effects and intents.
//!
//! This module defines [`SessionAction`], the instructions produced by the
//! [`crate::Session`] state machine for the driver to execute. Actions are
//! fire-and-forget from the machine's point of view; completions and
//! failures come back as [`crate::SessionEvent`]s.
//!
//! Resource-releasing actions (`ReleaseMedia`, `StopTrack`, `Close*`) must
//! be implemented as safe no-ops when the resource is already gone; teardown
//! emits them unconditionally and best-effort.

use std::time::Duration;

use ghostwire_core::{RoomCode, SessionError};
use ghostwire_proto::ChatFrame;

use crate::handle::{CallId, ChannelId, RemoteStreamId, StreamHandle, TrackId};
use crate::media::MediaConstraints;

/// Actions produced by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Request combined camera+microphone capture.
    ///
    /// Completes as `MediaAcquired` or `MediaFailed`.
    AcquireMedia {
        /// Capture preferences.
        constraints: MediaConstraints,
    },

    /// Request a camera video track only (screen-share reversal).
    ///
    /// Completes as `CameraRestored` or `ScreenFailed`.
    AcquireCamera {
        /// Capture preferences.
        constraints: MediaConstraints,
    },

    /// Request a screen/window capture track.
    ///
    /// Completes as `ScreenAcquired` or `ScreenFailed`. The driver must
    /// register the track's end-of-stream callback and report it as
    /// `ScreenTrackEnded`.
    AcquireScreen,

    /// Stop every track of a stream. Idempotent.
    ReleaseMedia {
        /// The stream to release.
        stream: StreamHandle,
    },

    /// Stop a single track. Idempotent.
    StopTrack {
        /// The track to stop.
        track: TrackId,
    },

    /// Toggle a live track's enabled flag. No renegotiation.
    SetTrackEnabled {
        /// The track to mutate.
        track: TrackId,
        /// Desired enabled state.
        enabled: bool,
    },

    /// Register with the signaling broker under `identity`.
    ///
    /// Completes as `SignalingOpen` or `SignalingFailed`.
    OpenSignaling {
        /// Our discovery identity (the room code when hosting).
        identity: RoomCode,
    },

    /// Tear down the broker registration and everything attached to it.
    /// Idempotent.
    CloseSignaling,

    /// Answer an incoming call with the local stream.
    AnswerCall {
        /// The call to answer.
        call: CallId,
        /// Our local stream.
        stream: StreamHandle,
    },

    /// Initiate a media call toward a remote identity.
    DialPeer {
        /// The identity to call (the host's room code).
        code: RoomCode,
        /// Our local stream.
        stream: StreamHandle,
    },

    /// Open a chat transport toward a remote identity.
    OpenChannel {
        /// The identity to connect to.
        code: RoomCode,
    },

    /// Close the active call. Idempotent.
    CloseCall {
        /// The call to close.
        call: CallId,
    },

    /// Close the chat channel. Idempotent.
    CloseChannel {
        /// The channel to close.
        channel: ChannelId,
    },

    /// Replace the call's outgoing video source without renegotiating.
    ///
    /// The remote party's view stays continuous across the camera↔screen
    /// switch. Only the session's media manager issues this.
    ReplaceOutgoingVideo {
        /// The live call whose sender is mutated.
        call: CallId,
        /// The new video track.
        track: TrackId,
    },

    /// Attach the remote stream to the presentation layer.
    AttachRemoteStream {
        /// The remote party's media stream.
        stream: RemoteStreamId,
    },

    /// Fire `DialElapsed` after `delay`.
    ScheduleDial {
        /// How long to wait before (re)dialing.
        delay: Duration,
    },

    /// Send a frame on the chat channel.
    Send(ChatFrame),

    /// Play an audio cue.
    PlayCue(Cue),

    /// Present the room code (and shareable link) to the user while
    /// waiting as host.
    PresentRoomCode {
        /// The freshly generated code.
        code: RoomCode,
    },

    /// Surface an error to the user.
    NotifyError {
        /// What to report.
        error: SessionError,
    },

    /// Re-render the session state.
    Render,
}

/// Audio cues played at session transition points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The other party joined (session connected).
    Join,
    /// The session ended (either side left).
    Leave,
}
