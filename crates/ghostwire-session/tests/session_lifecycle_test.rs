//! End-to-end lifecycle tests driving host and guest sessions in lockstep.
//!
//! The "wire" between the two sessions is the test itself: actions produced
//! by one side are translated into the events the other side would observe.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use ghostwire_core::env::Environment;
use ghostwire_session::{
    CallId, ChannelId, Cue, DIAL_GRACE, DialFailure, MAX_DIAL_ATTEMPTS, Phase, RemoteStreamId,
    Role, RoomCode, SECURE_NOTICE, Session, SessionAction, SessionError, SessionEvent,
    StreamHandle, TrackId,
};

/// Deterministic environment with a virtual clock.
#[derive(Clone)]
struct TestEnv {
    start: std::time::Instant,
    offset_ms: Arc<AtomicU64>,
    entropy: Arc<AtomicU64>,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
            entropy: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Environment for TestEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> std::time::Instant {
        self.start + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }

    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = (self.entropy.fetch_add(1, Ordering::SeqCst) % 251) as u8;
        }
    }
}

fn presented_code(actions: &[SessionAction]) -> RoomCode {
    actions
        .iter()
        .find_map(|a| match a {
            SessionAction::PresentRoomCode { code } => Some(code.clone()),
            _ => None,
        })
        .expect("host presents a room code")
}

/// Drive a session through media acquisition and signaling registration.
fn establish(session: &mut Session<TestEnv>, stream: StreamHandle) -> Vec<SessionAction> {
    let actions = session.handle(SessionEvent::MediaAcquired { stream });
    assert!(
        actions.iter().any(|a| matches!(a, SessionAction::OpenSignaling { .. })),
        "media acquisition leads to signaling registration"
    );
    session.handle(SessionEvent::SignalingOpen)
}

#[test]
fn host_and_guest_reach_connected() {
    let env = TestEnv::new();
    let mut host = Session::new(env.clone());
    let mut guest = Session::new(env);

    // Host creates the room.
    let actions = host.handle(SessionEvent::CreateRoom);
    let code = presented_code(&actions);
    assert_eq!(host.phase(), Phase::Waiting);
    assert_eq!(host.role(), Some(Role::Host));
    let _ = establish(&mut host, StreamHandle::new(TrackId(1), TrackId(2)));

    // Guest joins with the shared code.
    let _ = guest.handle(SessionEvent::JoinRoom { code: code.as_str().to_string() });
    assert_eq!(guest.phase(), Phase::Waiting);
    assert_eq!(guest.role(), Some(Role::Guest));
    assert_eq!(guest.room_code(), Some(&code));

    let actions = establish(&mut guest, StreamHandle::new(TrackId(11), TrackId(12)));
    assert_eq!(actions, vec![SessionAction::ScheduleDial { delay: DIAL_GRACE }]);

    // Grace period elapses; guest dials both legs.
    let actions = guest.handle(SessionEvent::DialElapsed);
    assert!(actions.iter().any(|a| matches!(a, SessionAction::DialPeer { .. })));
    assert!(actions.iter().any(|a| matches!(a, SessionAction::OpenChannel { .. })));

    // Host side: incoming call is answered, channel arrives, then both
    // ready conditions fire.
    let actions = host.handle(SessionEvent::IncomingCall { call: CallId(100) });
    assert!(matches!(actions.as_slice(), [SessionAction::AnswerCall { call: CallId(100), .. }]));
    let _ = host.handle(SessionEvent::IncomingChannel { channel: ChannelId(101) });
    let _ = host.handle(SessionEvent::ChannelOpen { channel: ChannelId(101) });
    assert_eq!(host.phase(), Phase::Waiting);
    let actions =
        host.handle(SessionEvent::CallStream { call: CallId(100), remote: RemoteStreamId(200) });
    assert_eq!(host.phase(), Phase::Connected);
    assert!(
        actions.contains(&SessionAction::AttachRemoteStream { stream: RemoteStreamId(200) })
    );
    assert!(actions.contains(&SessionAction::PlayCue(Cue::Join)));

    // Guest side: ready conditions in the opposite order.
    let _ =
        guest.handle(SessionEvent::CallStream { call: CallId(110), remote: RemoteStreamId(210) });
    assert_eq!(guest.phase(), Phase::Waiting);
    let _ = guest.handle(SessionEvent::ChannelOpen { channel: ChannelId(111) });
    assert_eq!(guest.phase(), Phase::Connected);

    // Each transcript holds exactly the System notice, no chat entries.
    for session in [&host, &guest] {
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].text, SECURE_NOTICE);
        assert!(session.call().is_some() && session.channel().is_some());
    }
}

#[test]
fn local_end_call_tears_down_and_remote_observes_close() {
    let env = TestEnv::new();
    let mut host = Session::new(env.clone());
    let mut guest = Session::new(env);

    let actions = host.handle(SessionEvent::CreateRoom);
    let code = presented_code(&actions);
    let _ = establish(&mut host, StreamHandle::new(TrackId(1), TrackId(2)));
    let _ = guest.handle(SessionEvent::JoinRoom { code: code.as_str().to_string() });
    let _ = establish(&mut guest, StreamHandle::new(TrackId(11), TrackId(12)));
    let _ = guest.handle(SessionEvent::DialElapsed);

    let _ = host.handle(SessionEvent::IncomingCall { call: CallId(100) });
    let _ = host.handle(SessionEvent::IncomingChannel { channel: ChannelId(101) });
    let _ = host.handle(SessionEvent::ChannelOpen { channel: ChannelId(101) });
    let _ = host.handle(SessionEvent::CallStream { call: CallId(100), remote: RemoteStreamId(1) });
    let _ = guest.handle(SessionEvent::CallStream { call: CallId(110), remote: RemoteStreamId(2) });
    let _ = guest.handle(SessionEvent::ChannelOpen { channel: ChannelId(111) });

    // Host hangs up.
    let actions = host.handle(SessionEvent::EndCall);
    assert!(actions.contains(&SessionAction::PlayCue(Cue::Leave)));
    assert!(actions.contains(&SessionAction::CloseCall { call: CallId(100) }));
    assert!(actions.contains(&SessionAction::CloseChannel { channel: ChannelId(101) }));
    assert!(actions.contains(&SessionAction::CloseSignaling));
    assert!(actions.iter().any(|a| matches!(a, SessionAction::ReleaseMedia { .. })));

    assert_eq!(host.phase(), Phase::Idle);
    assert!(host.room_code().is_none());
    assert!(host.transcript().is_empty());
    assert!(host.local_stream().is_none());

    // Guest sees the channel close: normal end of session, not a failure.
    let actions = guest.handle(SessionEvent::ChannelClosed);
    assert!(actions.contains(&SessionAction::PlayCue(Cue::Leave)));
    assert!(!actions.iter().any(|a| matches!(a, SessionAction::NotifyError { .. })));
    assert_eq!(guest.phase(), Phase::Idle);
    assert!(guest.transcript().is_empty());
}

#[test]
fn dial_retries_back_off_then_report_wrong_code() {
    let mut guest = Session::new(TestEnv::new());
    let _ = guest.handle(SessionEvent::JoinRoom { code: "AB12CD34".into() });
    let _ = establish(&mut guest, StreamHandle::new(TrackId(1), TrackId(2)));

    let mut delays = vec![DIAL_GRACE];
    loop {
        let actions = guest.handle(SessionEvent::DialElapsed);
        assert!(actions.iter().any(|a| matches!(a, SessionAction::DialPeer { .. })));

        let actions = guest.handle(SessionEvent::DialFailed {
            reason: DialFailure::UnknownIdentity,
        });
        if let [SessionAction::ScheduleDial { delay }] = actions.as_slice() {
            delays.push(*delay);
            continue;
        }

        // Attempts exhausted: a wrong-code error and a full teardown.
        assert!(actions.iter().any(|a| matches!(
            a,
            SessionAction::NotifyError { error: SessionError::PeerUnreachable { .. } }
        )));
        assert!(actions.contains(&SessionAction::CloseSignaling));
        break;
    }

    // Grace period, then doubling backoff, bounded by the attempt budget.
    assert_eq!(delays, vec![
        DIAL_GRACE,
        Duration::from_secs(1),
        Duration::from_secs(2),
        Duration::from_secs(4),
    ]);
    assert_eq!(delays.len() as u32, MAX_DIAL_ATTEMPTS);
    assert_eq!(guest.phase(), Phase::Idle);
}

#[test]
fn transport_dial_failures_surface_a_timeout() {
    let mut guest = Session::new(TestEnv::new());
    let _ = guest.handle(SessionEvent::JoinRoom { code: "AB12CD34".into() });
    let _ = establish(&mut guest, StreamHandle::new(TrackId(1), TrackId(2)));

    for _ in 0..MAX_DIAL_ATTEMPTS {
        let _ = guest.handle(SessionEvent::DialElapsed);
        let actions = guest.handle(SessionEvent::DialFailed {
            reason: DialFailure::Transport("ice failed".into()),
        });
        if actions.iter().any(|a| matches!(
            a,
            SessionAction::NotifyError { error: SessionError::DialTimeout { .. } }
        )) {
            assert_eq!(guest.phase(), Phase::Idle);
            return;
        }
    }
    panic!("dial loop never timed out");
}

#[test]
fn signaling_failure_while_waiting_tears_down() {
    let env = TestEnv::new();
    let mut host = Session::new(env);
    let _ = host.handle(SessionEvent::CreateRoom);
    let _ = host.handle(SessionEvent::MediaAcquired {
        stream: StreamHandle::new(TrackId(1), TrackId(2)),
    });

    let actions = host.handle(SessionEvent::SignalingFailed {
        error: ghostwire_session::SignalingError::BrokerUnreachable("dns".into()),
    });

    assert!(actions.iter().any(|a| matches!(a, SessionAction::NotifyError { .. })));
    assert!(actions.iter().any(|a| matches!(a, SessionAction::ReleaseMedia { .. })));
    assert_eq!(host.phase(), Phase::Idle);
}

#[test]
fn partial_establishment_teardown_closes_only_whats_open() {
    let env = TestEnv::new();
    let mut host = Session::new(env);
    let _ = host.handle(SessionEvent::CreateRoom);
    let _ = host.handle(SessionEvent::MediaAcquired {
        stream: StreamHandle::new(TrackId(1), TrackId(2)),
    });
    let _ = host.handle(SessionEvent::SignalingOpen);
    // Call in flight, channel still negotiating.
    let _ = host.handle(SessionEvent::IncomingCall { call: CallId(5) });

    let actions = host.handle(SessionEvent::EndCall);
    assert!(actions.contains(&SessionAction::CloseCall { call: CallId(5) }));
    assert!(!actions.iter().any(|a| matches!(a, SessionAction::CloseChannel { .. })));
    assert!(actions.contains(&SessionAction::CloseSignaling));
    assert_eq!(host.phase(), Phase::Idle);
}
