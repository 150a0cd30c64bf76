use livecast_engine::{
    ConnectionRole, ControllerState, MediaKind, PeerConnectionState, SessionEvent, StreamingMode,
};

use super::{count_matching, states_of};
use crate::integration::init_tracing;
use crate::utils::{
    Harness, MockTrack, PeerCall, answer_message, candidate_message, offer_message,
};

#[tokio::test]
async fn test_echo_round_trip_reaches_established() {
    init_tracing();

    let mut h = Harness::with_stream(StreamingMode::Echo).await;
    h.session.start(StreamingMode::Echo).await.expect("Start failed");

    // Exactly one offer, from the source leg only.
    assert_eq!(h.signaling.count("source_webrtc_event", "sdp_offer"), 1);
    assert_eq!(h.signaling.count("sink_webrtc_event", "sdp_offer"), 0);
    assert_eq!(
        h.session.controller_state(ConnectionRole::Source),
        Some(ControllerState::AwaitingRemoteAnswer)
    );
    assert_eq!(
        h.session.controller_state(ConnectionRole::Sink),
        Some(ControllerState::New)
    );

    let source = h.peers.peer(ConnectionRole::Source).expect("No source peer");
    let sink = h.peers.peer(ConnectionRole::Sink).expect("No sink peer");
    assert_eq!(
        source.journal()[..2],
        [
            PeerCall::AddSendOnly { track: "s0-audio-0".into() },
            PeerCall::AddSendOnly { track: "s0-video-0".into() },
        ]
    );
    assert_eq!(
        sink.journal()[..2],
        [
            PeerCall::AddRecvOnly(MediaKind::Audio),
            PeerCall::AddRecvOnly(MediaKind::Video),
        ]
    );

    // A candidate racing ahead of the answer is held back.
    h.session
        .on_signaling_message("source_webrtc_event", candidate_message("candidate:early"))
        .await
        .expect("Candidate failed");
    assert_eq!(h.session.pending_candidates(), 1);

    h.session
        .on_signaling_message("source_webrtc_event", answer_message("v=0 answer"))
        .await
        .expect("Answer failed");
    assert_eq!(
        h.session.controller_state(ConnectionRole::Source),
        Some(ControllerState::Negotiated)
    );
    assert_eq!(source.added_candidates(), vec!["candidate:early".to_string()]);

    h.session
        .on_signaling_message("sink_webrtc_event", offer_message("v=0 return"))
        .await
        .expect("Sink offer failed");
    assert_eq!(h.signaling.count("sink_webrtc_event", "sdp_answer"), 1);
    assert_eq!(
        h.session.controller_state(ConnectionRole::Sink),
        Some(ControllerState::Negotiated)
    );

    // The sink's own candidates are trickled to the far end on its channel.
    sink.emit_local_candidate("candidate:sink-local");
    sink.emit_remote_track(MockTrack::new("remote-video", MediaKind::Video));
    source.emit_state(PeerConnectionState::Connected);
    sink.emit_state(PeerConnectionState::Connected);
    h.session.run_until_idle().await;

    let sent = h
        .signaling
        .last_data("sink_webrtc_event", "ice_candidate")
        .expect("Sink candidate not sent");
    assert_eq!(sent["candidate"], "candidate:sink-local");
    assert!(sink.added_candidates().is_empty());

    assert!(h.session.is_established());
    assert_eq!(h.session.pending_candidates(), 0);

    let events = h.drain_events();
    assert_eq!(
        count_matching(&events, |e| matches!(e, SessionEvent::Established)),
        1
    );
    assert_eq!(
        count_matching(&events, |e| matches!(e, SessionEvent::RemoteTrack(_))),
        1
    );
    assert_eq!(
        states_of(&events, ConnectionRole::Sink),
        vec![
            ControllerState::New,
            ControllerState::Negotiated,
            ControllerState::Connected,
        ]
    );
    assert_eq!(Harness::failures(&events), 0);
}

#[tokio::test]
async fn test_stop_after_established_releases_everything() {
    init_tracing();

    let mut h = Harness::with_stream(StreamingMode::Echo).await;
    h.session.start(StreamingMode::Echo).await.expect("Start failed");
    h.session
        .on_signaling_message("source_webrtc_event", answer_message("v=0"))
        .await
        .expect("Answer failed");
    h.session
        .on_signaling_message("sink_webrtc_event", offer_message("v=0"))
        .await
        .expect("Offer failed");
    h.drain_events();

    h.session.stop().await.expect("Stop failed");

    assert!(!h.session.is_streaming());
    assert_eq!(h.session.controller_count(), 0);
    for peer in h.peers.peers() {
        assert_eq!(peer.close_count(), 1);
    }
    assert_eq!(h.devices.live_streams(), 0, "stop re-probes and holds no capture");

    let events = h.drain_events();
    assert!(events.iter().any(|e| matches!(e, SessionEvent::StreamingStopped)));
    assert!(matches!(events.last(), Some(SessionEvent::DevicesChanged(_))));

    // Stopping again is a no-op.
    h.session.stop().await.expect("Second stop failed");
    assert!(h.drain_events().is_empty());
}
