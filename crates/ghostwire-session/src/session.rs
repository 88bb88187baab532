//! Session lifecycle state machine.
//!
//! This module defines [`Session`], the orchestrator that folds four
//! partially-ordered event streams (signaling events, inbound call events,
//! data-channel events, local user actions) into one consistent session
//! state. It is a pure state machine: it consumes [`SessionEvent`] inputs
//! and produces [`SessionAction`] instructions for the driver to execute.
//!
//! # Lifecycle
//!
//! `Idle → Waiting(role) → Connected → Idle`, always cycling back to Idle;
//! there is no permanent terminal state. Waiting→Connected is gated on two
//! independent latches (call stream seen, chat channel open) that arrive in
//! either order and must each be idempotent against duplicates.
//!
//! # Error policy
//!
//! `handle` is infallible. Every establishment failure is resolved locally
//! into a full teardown plus a single `NotifyError`; nothing propagates as
//! an unhandled fault. There is no automatic retry beyond the bounded dial
//! loop; every other retry is a new user action.

use std::time::Duration;

use ghostwire_core::{RoomCode, SessionError, env::Environment};
use ghostwire_proto::ChatFrame;

use crate::action::{Cue, SessionAction};
use crate::event::{DialFailure, SessionEvent};
use crate::handle::{CallId, ChannelId, RemoteStreamId, StreamHandle, TrackId};
use crate::media::{MediaConstraints, MediaSources};
use crate::state::{ChatEntry, MediaFlags, Phase, Role};

/// Grace period between identity registration and the first guest dial,
/// letting the broker propagate the host's registration.
pub const DIAL_GRACE: Duration = Duration::from_secs(1);

/// Backoff after the first failed dial attempt; doubles per retry.
const DIAL_RETRY_BASE: Duration = Duration::from_secs(1);

/// Dial attempts before establishment is abandoned.
pub const MAX_DIAL_ATTEMPTS: u32 = 4;

/// How long the remote party stays "typing" after a typing frame.
pub const TYPING_WINDOW: Duration = Duration::from_secs(3);

/// System transcript entry appended when the session connects.
pub const SECURE_NOTICE: &str =
    "Connected securely. Room will close when either person leaves.";

/// Guest dial progress during establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialState {
    /// Not dialing (host, or not yet registered).
    Idle,
    /// A dial timer is running for attempt `attempt`.
    Scheduled { attempt: u32 },
    /// Attempt `attempt` has been dialed and is pending.
    InFlight { attempt: u32 },
}

/// The session aggregate and its state machine.
///
/// Single-threaded by construction: `handle` runs to completion before the
/// next event is processed, so no locking is needed. The driver owns all
/// suspension points; completions that arrive after a teardown are detected
/// by phase checks and discarded (releasing any resource they carry) rather
/// than resurrecting the session.
#[derive(Debug, Clone)]
pub struct Session<E: Environment> {
    env: E,
    phase: Phase,
    role: Option<Role>,
    /// The room being hosted or joined. Non-empty iff `phase != Idle`.
    room_code: Option<RoomCode>,
    /// Our signaling identity: the room code when hosting, an ephemeral
    /// code when joining.
    identity: Option<RoomCode>,
    /// An `OpenSignaling` has been issued and not yet torn down.
    signaling_open: bool,
    media: MediaSources,
    call: Option<CallId>,
    channel: Option<ChannelId>,
    /// Latch: the call's remote stream has been observed.
    call_stream_seen: bool,
    /// Latch: the chat channel has been observed open.
    channel_open_seen: bool,
    remote_stream: Option<RemoteStreamId>,
    transcript: Vec<ChatEntry>,
    /// The remote party is "typing" until this deadline passes.
    peer_typing_until: Option<E::Instant>,
    dial: DialState,
}

impl<E: Environment> Session<E> {
    /// Create an idle session.
    pub fn new(env: E) -> Self {
        Self {
            env,
            phase: Phase::Idle,
            role: None,
            room_code: None,
            identity: None,
            signaling_open: false,
            media: MediaSources::new(),
            call: None,
            channel: None,
            call_stream_seen: false,
            channel_open_seen: false,
            remote_stream: None,
            transcript: Vec::new(),
            peer_typing_until: None,
            dial: DialState::Idle,
        }
    }

    /// Process an event and return the actions to execute.
    pub fn handle(&mut self, event: SessionEvent<E::Instant>) -> Vec<SessionAction> {
        match event {
            SessionEvent::CreateRoom => self.create_room(),
            SessionEvent::JoinRoom { code } => self.join_room(&code),
            SessionEvent::EndCall => self.end_session(),
            SessionEvent::SendMessage { text } => self.send_message(&text),
            SessionEvent::InputChanged => self.input_changed(),
            SessionEvent::ToggleMute => self.toggle_track(MediaSources::toggle_audio),
            SessionEvent::ToggleCamera => self.toggle_track(MediaSources::toggle_video),
            SessionEvent::StartScreenShare => self.start_screen_share(),
            SessionEvent::StopScreenShare | SessionEvent::ScreenTrackEnded => {
                self.stop_screen_share()
            },
            SessionEvent::MediaAcquired { stream } => self.on_media_acquired(stream),
            SessionEvent::MediaFailed { error } => self.on_media_failed(error.into()),
            SessionEvent::ScreenAcquired { track } => self.on_screen_acquired(track),
            SessionEvent::ScreenFailed { error } => self.on_screen_failed(error.into()),
            SessionEvent::CameraRestored { track } => self.on_camera_restored(track),
            SessionEvent::SignalingOpen => self.on_signaling_open(),
            SessionEvent::SignalingFailed { error } => self.fail(error.into()),
            SessionEvent::IncomingCall { call } => self.on_incoming_call(call),
            SessionEvent::IncomingChannel { channel } => self.on_incoming_channel(channel),
            SessionEvent::DialElapsed => self.on_dial_elapsed(),
            SessionEvent::DialFailed { reason } => self.on_dial_failed(&reason),
            SessionEvent::CallStream { call, remote } => self.on_call_stream(call, remote),
            SessionEvent::ChannelOpen { channel } => self.on_channel_open(channel),
            SessionEvent::ChannelClosed => self.on_channel_closed(),
            SessionEvent::DataReceived { payload } => self.on_data(&payload),
            SessionEvent::Tick { now } => self.on_tick(now),
        }
    }

    // --- establishment -----------------------------------------------------

    fn create_room(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Idle {
            tracing::warn!(phase = ?self.phase, "ignoring CreateRoom outside Idle");
            return vec![];
        }

        let code = RoomCode::generate(&self.env);
        self.role = Some(Role::Host);
        self.room_code = Some(code.clone());
        self.identity = Some(code.clone());
        self.enter_waiting();

        vec![
            SessionAction::AcquireMedia { constraints: MediaConstraints::default() },
            SessionAction::PresentRoomCode { code },
            SessionAction::Render,
        ]
    }

    fn join_room(&mut self, input: &str) -> Vec<SessionAction> {
        if self.phase != Phase::Idle {
            tracing::warn!(phase = ?self.phase, "ignoring JoinRoom outside Idle");
            return vec![];
        }

        let code = match RoomCode::parse(input) {
            Ok(code) => code,
            Err(e) => {
                // Rejected before anything is established; stay Idle.
                return vec![
                    SessionAction::NotifyError { error: e.into() },
                    SessionAction::Render,
                ];
            },
        };

        self.role = Some(Role::Guest);
        self.room_code = Some(code);
        self.identity = Some(RoomCode::generate(&self.env));
        self.enter_waiting();

        vec![
            SessionAction::AcquireMedia { constraints: MediaConstraints::default() },
            SessionAction::Render,
        ]
    }

    /// Idle→Waiting: the one place the transcript is reset for the session.
    fn enter_waiting(&mut self) {
        self.phase = Phase::Waiting;
        self.transcript.clear();
        self.peer_typing_until = None;
    }

    fn on_media_acquired(&mut self, stream: StreamHandle) -> Vec<SessionAction> {
        if self.phase != Phase::Waiting || self.media.stream().is_some() {
            // Torn down (or duplicated) while acquisition was pending.
            tracing::warn!(phase = ?self.phase, "releasing stale media acquisition");
            return vec![SessionAction::ReleaseMedia { stream }];
        }

        let Some(identity) = self.identity.clone() else {
            tracing::warn!("media acquired with no identity; releasing");
            return vec![SessionAction::ReleaseMedia { stream }];
        };

        self.media.adopt_stream(stream);
        self.signaling_open = true;
        vec![SessionAction::OpenSignaling { identity }]
    }

    /// Camera+mic acquisition failed: the session cannot proceed without
    /// local media, so establishment is aborted whatever the reported cause.
    fn on_media_failed(&mut self, error: SessionError) -> Vec<SessionAction> {
        if self.phase == Phase::Idle {
            tracing::warn!(error = %error, "media failure after teardown; ignoring");
            return vec![];
        }

        let mut actions = vec![SessionAction::NotifyError { error }];
        self.teardown(&mut actions);
        actions.push(SessionAction::Render);
        actions
    }

    fn on_signaling_open(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Waiting {
            tracing::warn!(phase = ?self.phase, "ignoring SignalingOpen");
            return vec![];
        }

        match self.role {
            Some(Role::Host) => vec![SessionAction::Render],
            Some(Role::Guest) => {
                self.dial = DialState::Scheduled { attempt: 1 };
                vec![SessionAction::ScheduleDial { delay: DIAL_GRACE }]
            },
            None => vec![],
        }
    }

    fn on_incoming_call(&mut self, call: CallId) -> Vec<SessionAction> {
        if self.phase != Phase::Waiting || self.call.is_some() {
            tracing::warn!(phase = ?self.phase, "ignoring incoming call");
            return vec![];
        }
        let Some(stream) = self.media.stream() else {
            tracing::warn!("incoming call before local media; ignoring");
            return vec![];
        };

        self.call = Some(call);
        vec![SessionAction::AnswerCall { call, stream }]
    }

    fn on_incoming_channel(&mut self, channel: ChannelId) -> Vec<SessionAction> {
        if self.phase != Phase::Waiting || self.channel.is_some() {
            tracing::warn!(phase = ?self.phase, "ignoring incoming channel");
            return vec![];
        }
        self.channel = Some(channel);
        vec![]
    }

    fn on_dial_elapsed(&mut self) -> Vec<SessionAction> {
        let DialState::Scheduled { attempt } = self.dial else {
            return vec![];
        };
        if self.phase != Phase::Waiting || self.role != Some(Role::Guest) {
            return vec![];
        }
        let (Some(code), Some(stream)) = (self.room_code.clone(), self.media.stream()) else {
            tracing::warn!("dial timer with no room code or stream");
            return vec![];
        };

        self.dial = DialState::InFlight { attempt };

        // Re-dial only the side that has not come up yet.
        let mut actions = Vec::new();
        if !self.call_stream_seen {
            actions.push(SessionAction::DialPeer { code: code.clone(), stream });
        }
        if !self.channel_open_seen {
            actions.push(SessionAction::OpenChannel { code });
        }
        actions
    }

    fn on_dial_failed(&mut self, reason: &DialFailure) -> Vec<SessionAction> {
        let DialState::InFlight { attempt } = self.dial else {
            return vec![];
        };
        if self.phase != Phase::Waiting {
            return vec![];
        }

        if attempt < MAX_DIAL_ATTEMPTS {
            let backoff = DIAL_RETRY_BASE * 2u32.saturating_pow(attempt - 1);
            tracing::debug!(attempt, ?reason, ?backoff, "dial failed; retrying");
            self.dial = DialState::Scheduled { attempt: attempt + 1 };
            return vec![SessionAction::ScheduleDial { delay: backoff }];
        }

        // Out of attempts. A still-unknown identity most likely means the
        // code is wrong; anything else is reported as a timeout.
        let error = match (reason, self.room_code.as_ref()) {
            (DialFailure::UnknownIdentity, Some(code)) => {
                SessionError::PeerUnreachable { code: code.as_str().to_string() }
            },
            _ => SessionError::DialTimeout { attempts: attempt },
        };
        self.fail(error)
    }

    fn on_call_stream(&mut self, call: CallId, remote: RemoteStreamId) -> Vec<SessionAction> {
        if self.phase == Phase::Idle || self.call_stream_seen {
            // Duplicate or stale; the latch is one-shot.
            return vec![];
        }

        if self.call.is_none() {
            self.call = Some(call);
        }
        self.call_stream_seen = true;
        self.remote_stream = Some(remote);
        self.try_connect()
    }

    fn on_channel_open(&mut self, channel: ChannelId) -> Vec<SessionAction> {
        if self.phase == Phase::Idle || self.channel_open_seen {
            return vec![];
        }

        if self.channel.is_none() {
            self.channel = Some(channel);
        }
        self.channel_open_seen = true;
        self.try_connect()
    }

    /// Waiting→Connected once both latches are set; exactly once.
    fn try_connect(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Waiting || !self.call_stream_seen || !self.channel_open_seen {
            return vec![];
        }

        self.phase = Phase::Connected;
        self.dial = DialState::Idle;
        self.transcript.push(ChatEntry::system(SECURE_NOTICE));

        let mut actions = Vec::new();
        if let Some(remote) = self.remote_stream {
            actions.push(SessionAction::AttachRemoteStream { stream: remote });
        }
        actions.push(SessionAction::PlayCue(Cue::Join));
        actions.push(SessionAction::Render);
        actions
    }

    // --- chat --------------------------------------------------------------

    fn send_message(&mut self, text: &str) -> Vec<SessionAction> {
        if self.phase != Phase::Connected || self.channel.is_none() {
            return vec![];
        }
        let Some(text) = ghostwire_proto::sendable(text) else {
            // Empty after trim: never transmitted, never echoed.
            return vec![];
        };

        // Local echo before transmission; delivery order is the
        // transport's guarantee, not ours.
        self.transcript.push(ChatEntry::local(text));
        vec![
            SessionAction::Send(ChatFrame::Message(text.to_string())),
            SessionAction::Render,
        ]
    }

    fn input_changed(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Connected || self.channel.is_none() {
            return vec![];
        }
        vec![SessionAction::Send(ChatFrame::Typing)]
    }

    fn on_data(&mut self, payload: &[u8]) -> Vec<SessionAction> {
        if self.phase == Phase::Idle || self.channel.is_none() {
            return vec![];
        }

        match ChatFrame::decode(payload) {
            Ok(ChatFrame::Typing) => {
                // Reset, not extend: each frame supersedes the prior window.
                self.peer_typing_until = Some(self.env.now() + TYPING_WINDOW);
                vec![SessionAction::Render]
            },
            Ok(ChatFrame::Message(text)) => {
                self.transcript.push(ChatEntry::remote(text));
                vec![SessionAction::Render]
            },
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable chat frame");
                vec![]
            },
        }
    }

    fn on_tick(&mut self, now: E::Instant) -> Vec<SessionAction> {
        if let Some(until) = self.peer_typing_until
            && now >= until
        {
            self.peer_typing_until = None;
            return vec![SessionAction::Render];
        }
        vec![]
    }

    // --- media controls ----------------------------------------------------

    fn toggle_track(
        &mut self,
        toggle: fn(&mut MediaSources) -> Option<SessionAction>,
    ) -> Vec<SessionAction> {
        if self.phase == Phase::Idle {
            return vec![];
        }
        match toggle(&mut self.media) {
            Some(action) => vec![action, SessionAction::Render],
            None => vec![],
        }
    }

    fn start_screen_share(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Connected || self.call.is_none() {
            return vec![];
        }
        match self.media.request_screen() {
            Some(action) => vec![action],
            None => vec![],
        }
    }

    fn stop_screen_share(&mut self) -> Vec<SessionAction> {
        if self.phase != Phase::Connected {
            return vec![];
        }
        match self.media.request_stop_screen(MediaConstraints::default()) {
            Some(action) => vec![action],
            None => vec![],
        }
    }

    fn on_screen_acquired(&mut self, track: TrackId) -> Vec<SessionAction> {
        let Some(call) = self.call.filter(|_| self.phase == Phase::Connected) else {
            tracing::warn!("releasing stale screen track");
            return vec![SessionAction::StopTrack { track }];
        };

        let mut actions = self.media.adopt_screen(track, call);
        if self.media.flags().screen_sharing {
            actions.push(SessionAction::Render);
        }
        actions
    }

    fn on_screen_failed(&mut self, error: SessionError) -> Vec<SessionAction> {
        self.media.screen_failed();
        if self.phase != Phase::Connected {
            return vec![];
        }
        // Local, non-fatal: the call continues unaffected.
        vec![SessionAction::NotifyError { error }, SessionAction::Render]
    }

    fn on_camera_restored(&mut self, track: TrackId) -> Vec<SessionAction> {
        let Some(call) = self.call.filter(|_| self.phase == Phase::Connected) else {
            tracing::warn!("releasing stale camera track");
            return vec![SessionAction::StopTrack { track }];
        };

        let mut actions = self.media.restore_camera(track, call);
        if !self.media.flags().screen_sharing {
            actions.push(SessionAction::Render);
        }
        actions
    }

    // --- teardown ----------------------------------------------------------

    fn end_session(&mut self) -> Vec<SessionAction> {
        if self.phase == Phase::Idle {
            return vec![];
        }
        let mut actions = vec![SessionAction::PlayCue(Cue::Leave)];
        self.teardown(&mut actions);
        actions.push(SessionAction::Render);
        actions
    }

    fn on_channel_closed(&mut self) -> Vec<SessionAction> {
        // Remote departure is a normal end-of-session, not a failure.
        self.end_session()
    }

    /// Resolve a fatal establishment/media error: one notification, full
    /// teardown. Non-fatal errors only surface the notification.
    fn fail(&mut self, error: SessionError) -> Vec<SessionAction> {
        if self.phase == Phase::Idle {
            tracing::warn!(error = %error, "error after teardown; ignoring");
            return vec![];
        }

        let mut actions = vec![SessionAction::NotifyError { error: error.clone() }];
        if error.is_fatal() {
            self.teardown(&mut actions);
        }
        actions.push(SessionAction::Render);
        actions
    }

    /// Close everything, best-effort, and reset to Idle defaults.
    ///
    /// Idempotent: every close action is a safe no-op driver-side when the
    /// resource is already gone, and a second invocation finds nothing to
    /// emit.
    fn teardown(&mut self, actions: &mut Vec<SessionAction>) {
        if let Some(call) = self.call.take() {
            actions.push(SessionAction::CloseCall { call });
        }
        if let Some(channel) = self.channel.take() {
            actions.push(SessionAction::CloseChannel { channel });
        }
        if self.signaling_open {
            self.signaling_open = false;
            actions.push(SessionAction::CloseSignaling);
        }
        if let Some(release) = self.media.reset() {
            actions.push(release);
        }

        self.phase = Phase::Idle;
        self.role = None;
        self.room_code = None;
        self.identity = None;
        self.call_stream_seen = false;
        self.channel_open_seen = false;
        self.remote_stream = None;
        self.transcript.clear();
        self.peer_typing_until = None;
        self.dial = DialState::Idle;
    }

    // --- observers ---------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current role. `None` while Idle.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// The open room's code. `None` while Idle.
    pub fn room_code(&self) -> Option<&RoomCode> {
        self.room_code.as_ref()
    }

    /// The chat transcript, oldest first.
    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Local media toggle state.
    pub fn media_flags(&self) -> MediaFlags {
        self.media.flags()
    }

    /// The local capture stream, once acquired.
    pub fn local_stream(&self) -> Option<StreamHandle> {
        self.media.stream()
    }

    /// The active call handle. Present iff established (or in flight).
    pub fn call(&self) -> Option<CallId> {
        self.call
    }

    /// The chat channel handle.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Whether the remote party is typing as of `now`.
    pub fn peer_typing(&self, now: E::Instant) -> bool {
        self.peer_typing_until.is_some_and(|until| now < until)
    }
}
