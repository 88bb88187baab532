//! Local media source management.
//!
//! Bookkeeping for the local capture stream on behalf of the session: track
//! enable flags, and the camera↔screen hot-swap of the outgoing video
//! track. Device capture itself happens driver-side; this manager only
//! decides which track actions to emit and owns the substitution guards.
//!
//! # Invariants
//!
//! - `flags.screen_sharing` is true iff the stream's video slot currently
//!   holds a screen track.
//! - The screen-share reversal runs at most once per share: the
//!   `stop_in_flight` one-shot makes the second of {user stop, external
//!   track end} a no-op.
//! - Only this manager produces `ReplaceOutgoingVideo`; the session layer
//!   never mutates a call's sender directly.

use crate::action::SessionAction;
use crate::handle::{CallId, StreamHandle, TrackId};
use crate::state::MediaFlags;

/// Camera/microphone capture preferences.
///
/// Advisory targets the driver passes to the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    /// Audio echo cancellation.
    pub echo_cancellation: bool,
    /// Audio noise suppression.
    pub noise_suppression: bool,
    /// Audio automatic gain control.
    pub auto_gain_control: bool,
    /// Target video width in pixels.
    pub width: u32,
    /// Target video height in pixels.
    pub height: u32,
    /// Target video frame rate.
    pub frame_rate: u32,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
            width: 1920,
            height: 1080,
            frame_rate: 30,
        }
    }
}

/// Manager for the local capture stream and its tracks.
#[derive(Debug, Clone, Default)]
pub struct MediaSources {
    stream: Option<StreamHandle>,
    flags: MediaFlags,
    /// The screen track while sharing (mirrors the stream's video slot).
    screen_track: Option<TrackId>,
    /// A screen capture request is outstanding.
    screen_pending: bool,
    /// One-shot guard for the share reversal.
    stop_in_flight: bool,
}

impl MediaSources {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active local stream, if acquired.
    pub fn stream(&self) -> Option<StreamHandle> {
        self.stream
    }

    /// Current toggle flags.
    pub fn flags(&self) -> MediaFlags {
        self.flags
    }

    /// True while a share reversal is mid-flight.
    pub fn stop_in_flight(&self) -> bool {
        self.stop_in_flight
    }

    /// Adopt a freshly acquired camera+mic stream. Resets flags to their
    /// defaults (everything enabled, no sharing).
    pub fn adopt_stream(&mut self, stream: StreamHandle) {
        self.stream = Some(stream);
        self.flags = MediaFlags::default();
        self.screen_track = None;
        self.screen_pending = false;
        self.stop_in_flight = false;
    }

    /// Toggle the microphone track. Returns the track action, or `None`
    /// when there is no audio track to toggle.
    pub fn toggle_audio(&mut self) -> Option<SessionAction> {
        let track = self.stream?.audio?;
        self.flags.audio_enabled = !self.flags.audio_enabled;
        Some(SessionAction::SetTrackEnabled { track, enabled: self.flags.audio_enabled })
    }

    /// Toggle the video track (camera, or screen while sharing).
    pub fn toggle_video(&mut self) -> Option<SessionAction> {
        let track = self.stream?.video?;
        self.flags.video_enabled = !self.flags.video_enabled;
        Some(SessionAction::SetTrackEnabled { track, enabled: self.flags.video_enabled })
    }

    /// Request a screen capture. Returns the acquire action, or `None` when
    /// a share is already active, requested, or being reversed.
    pub fn request_screen(&mut self) -> Option<SessionAction> {
        if self.stream.is_none()
            || self.flags.screen_sharing
            || self.screen_pending
            || self.stop_in_flight
        {
            return None;
        }
        self.screen_pending = true;
        Some(SessionAction::AcquireScreen)
    }

    /// An outstanding screen request or camera reacquisition failed.
    ///
    /// Clears both one-shot guards so the user can retry the share, or
    /// retry the stop while the dead screen track is still in the slot.
    pub fn screen_failed(&mut self) {
        self.screen_pending = false;
        self.stop_in_flight = false;
    }

    /// Swap the acquired screen track onto the call's outgoing video.
    ///
    /// Stops the previous camera track: reversal reacquires the camera
    /// fresh. Returns the substitution actions, or a lone stop for the
    /// screen track when no request was outstanding (stale completion).
    pub fn adopt_screen(&mut self, track: TrackId, call: CallId) -> Vec<SessionAction> {
        if !self.screen_pending {
            return vec![SessionAction::StopTrack { track }];
        }
        self.screen_pending = false;

        let Some(stream) = self.stream.as_mut() else {
            return vec![SessionAction::StopTrack { track }];
        };

        let mut actions = vec![SessionAction::ReplaceOutgoingVideo { call, track }];
        if let Some(camera) = stream.video.replace(track) {
            actions.push(SessionAction::StopTrack { track: camera });
        }
        self.screen_track = Some(track);
        self.flags.screen_sharing = true;
        self.flags.video_enabled = true;
        actions
    }

    /// Arm the share reversal. Returns the camera reacquisition action
    /// exactly once per share; subsequent calls observe a no-op.
    pub fn request_stop_screen(&mut self, constraints: MediaConstraints) -> Option<SessionAction> {
        if !self.flags.screen_sharing || self.stop_in_flight {
            return None;
        }
        self.stop_in_flight = true;
        Some(SessionAction::AcquireCamera { constraints })
    }

    /// Complete the reversal with the reacquired camera track: swap it back
    /// onto the call and fully release the screen track.
    pub fn restore_camera(&mut self, track: TrackId, call: CallId) -> Vec<SessionAction> {
        if !self.stop_in_flight {
            return vec![SessionAction::StopTrack { track }];
        }
        self.stop_in_flight = false;

        let Some(stream) = self.stream.as_mut() else {
            return vec![SessionAction::StopTrack { track }];
        };

        let mut actions = vec![SessionAction::ReplaceOutgoingVideo { call, track }];
        stream.video = Some(track);
        if let Some(screen) = self.screen_track.take() {
            actions.push(SessionAction::StopTrack { track: screen });
        }
        self.flags.screen_sharing = false;
        self.flags.video_enabled = true;
        actions
    }

    /// Release the stream and reset every flag and guard. Returns the
    /// release action when a stream was held.
    pub fn reset(&mut self) -> Option<SessionAction> {
        let released = self.stream.take().map(|stream| SessionAction::ReleaseMedia { stream });
        self.flags = MediaFlags::default();
        self.screen_track = None;
        self.screen_pending = false;
        self.stop_in_flight = false;
        released
    }
}
