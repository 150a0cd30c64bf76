use futures::channel::mpsc;
use livecast_engine::{
    MediaConstraints, SessionConfig, SessionEvent, StreamingMode, StreamingSession,
};
use serde_json::{Value, json};

use crate::utils::{MockDevices, MockPeerFactory, MockSignaling, MockStream, MockTrack};

pub type TestSession = StreamingSession<MockDevices, MockPeerFactory>;
pub type TestEvent = SessionEvent<MockStream, MockTrack>;

/// A session wired to mock devices, peers and signaling.
pub struct Harness {
    pub session: TestSession,
    pub events: mpsc::UnboundedReceiver<TestEvent>,
    pub devices: MockDevices,
    pub peers: MockPeerFactory,
    pub signaling: MockSignaling,
}

impl Harness {
    pub fn new(mode: StreamingMode) -> Self {
        let devices = MockDevices::new();
        let peers = MockPeerFactory::new();
        let signaling = MockSignaling::new();

        let (session, events) = StreamingSession::new(
            SessionConfig::new(mode),
            devices.clone(),
            peers.clone(),
            signaling.adapter(),
        );

        Self {
            session,
            events,
            devices,
            peers,
            signaling,
        }
    }

    /// Harness whose session already holds a captured stream.
    pub async fn with_stream(mode: StreamingMode) -> Self {
        let mut harness = Self::new(mode);
        let constraints = MediaConstraints::default()
            .with_audio_device("mic-1")
            .with_video_device("cam-1");
        harness
            .session
            .apply_constraints(constraints)
            .await
            .expect("Failed to acquire stream");
        harness.drain_events();
        harness
    }

    pub fn drain_events(&mut self) -> Vec<TestEvent> {
        let mut out = Vec::new();
        while let Ok(Some(event)) = self.events.try_next() {
            out.push(event);
        }
        out
    }

    pub fn failures(events: &[TestEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SessionEvent::SessionFailed(_)))
            .count()
    }

    pub fn warnings(events: &[TestEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Warning(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }
}

pub fn answer_message(sdp: &str) -> Value {
    json!({"type": "sdp_answer", "data": {"type": "answer", "sdp": sdp}})
}

pub fn offer_message(sdp: &str) -> Value {
    json!({"type": "sdp_offer", "data": {"type": "offer", "sdp": sdp}})
}

pub fn candidate_message(candidate: &str) -> Value {
    json!({
        "type": "ice_candidate",
        "data": {"candidate": candidate, "sdpMid": "0", "sdpMLineIndex": 0}
    })
}
