mod test_close_idempotent;

use futures::channel::mpsc;
use livecast_engine::{
    Channel, CloseFlag, ConnectionRole, MediaKind, PeerController, TaggedPeerEvent,
};

use crate::utils::{MockPeer, MockPeerFactory, MockSignaling, MockTrack};

pub struct ControllerFixture {
    pub controller: PeerController<MockPeer>,
    pub peer: MockPeer,
    pub signaling: MockSignaling,
    pub cancel: CloseFlag,
    pub _events: mpsc::UnboundedReceiver<TaggedPeerEvent<MockTrack>>,
}

pub async fn open_controller(role: ConnectionRole) -> ControllerFixture {
    open_with(&MockPeerFactory::new(), role).await
}

/// Opens a controller through `factory`, so tests can script failures first.
pub async fn open_with(factory: &MockPeerFactory, role: ConnectionRole) -> ControllerFixture {
    let signaling = MockSignaling::new();
    let (tx, rx) = mpsc::unbounded();
    let cancel = CloseFlag::new();
    let channel = match role {
        ConnectionRole::Source => Channel::SourceWebrtc,
        ConnectionRole::Sink => Channel::SinkWebrtc,
    };
    let tracks = vec![
        MockTrack::new("a0", MediaKind::Audio),
        MockTrack::new("v0", MediaKind::Video),
    ];

    let controller = PeerController::open(
        factory,
        role,
        channel,
        &tracks,
        signaling.adapter(),
        tx,
        cancel.clone(),
    )
    .await
    .expect("Failed to open controller");

    let peer = factory.peer(role).expect("No peer created");
    ControllerFixture {
        controller,
        peer,
        signaling,
        cancel,
        _events: rx,
    }
}
