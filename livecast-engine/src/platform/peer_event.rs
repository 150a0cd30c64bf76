use futures::channel::mpsc;
use livecast_core::{ConnectionRole, ControllerId, IceCandidate, PeerConnectionState};

#[derive(Debug)]
pub enum PeerEvent<R> {
    LocalCandidate(IceCandidate),
    RemoteTrack(R),
    ConnectionState(PeerConnectionState),
}

/// Platform event stamped with the controller allocation that produced it.
#[derive(Debug)]
pub struct TaggedPeerEvent<R> {
    pub controller: ControllerId,
    pub role: ConnectionRole,
    pub event: PeerEvent<R>,
}

/// Handed to a platform connection at creation; its callbacks push events through here.
pub struct PeerEventSink<R> {
    controller: ControllerId,
    role: ConnectionRole,
    tx: mpsc::UnboundedSender<TaggedPeerEvent<R>>,
}

impl<R> Clone for PeerEventSink<R> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller,
            role: self.role,
            tx: self.tx.clone(),
        }
    }
}

impl<R> PeerEventSink<R> {
    pub fn new(
        controller: ControllerId,
        role: ConnectionRole,
        tx: mpsc::UnboundedSender<TaggedPeerEvent<R>>,
    ) -> Self {
        Self {
            controller,
            role,
            tx,
        }
    }

    pub fn controller(&self) -> ControllerId {
        self.controller
    }

    pub fn role(&self) -> ConnectionRole {
        self.role
    }

    pub fn local_candidate(&self, candidate: IceCandidate) {
        self.emit(PeerEvent::LocalCandidate(candidate));
    }

    pub fn remote_track(&self, track: R) {
        self.emit(PeerEvent::RemoteTrack(track));
    }

    pub fn connection_state(&self, state: PeerConnectionState) {
        self.emit(PeerEvent::ConnectionState(state));
    }

    fn emit(&self, event: PeerEvent<R>) {
        // The receiver is gone once the session is dropped; late callbacks are ignored.
        let _ = self.tx.unbounded_send(TaggedPeerEvent {
            controller: self.controller,
            role: self.role,
            event,
        });
    }
}
