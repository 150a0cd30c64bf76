use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use livecast_engine::{
    ConnectionRole, ControllerId, IceCandidate, MediaKind, MediaTrack, PeerConnection,
    PeerConnectionState, PeerEventSink, PeerFactory, PlatformError, SdpType, SessionDescription,
};

use crate::utils::MockTrack;

/// One call made on a mock connection, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerCall {
    AddSendOnly { track: String },
    AddRecvOnly(MediaKind),
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpType),
    SetRemote(SdpType),
    AddCandidate(String),
    Close,
}

/// Failure switches shared by every connection a factory creates.
#[derive(Default)]
pub struct PeerScript {
    pub fail_create: bool,
    pub fail_set_local: bool,
    pub fail_set_remote: bool,
    pub reject_candidates: bool,
    /// Held by the next `create_offer` until the sender fires or is dropped.
    pub offer_gate: Option<oneshot::Receiver<()>>,
}

struct MockPeerInner {
    seq: usize,
    sink: PeerEventSink<MockTrack>,
    journal: RefCell<Vec<PeerCall>>,
    closes: Cell<u32>,
    script: Rc<RefCell<PeerScript>>,
}

/// Test-side view of a connection created through [`MockPeerFactory`].
#[derive(Clone)]
pub struct MockPeer {
    inner: Rc<MockPeerInner>,
}

impl MockPeer {
    pub fn role(&self) -> ConnectionRole {
        self.inner.sink.role()
    }

    pub fn controller(&self) -> ControllerId {
        self.inner.sink.controller()
    }

    pub fn journal(&self) -> Vec<PeerCall> {
        self.inner.journal.borrow().clone()
    }

    pub fn close_count(&self) -> u32 {
        self.inner.closes.get()
    }

    pub fn added_candidates(&self) -> Vec<String> {
        self.journal()
            .into_iter()
            .filter_map(|c| match c {
                PeerCall::AddCandidate(candidate) => Some(candidate),
                _ => None,
            })
            .collect()
    }

    pub fn emit_local_candidate(&self, candidate: &str) {
        let mut c = IceCandidate::new(candidate);
        c.sdp_mid = Some("0".into());
        c.sdp_m_line_index = Some(0);
        self.inner.sink.local_candidate(c);
    }

    pub fn emit_state(&self, state: PeerConnectionState) {
        self.inner.sink.connection_state(state);
    }

    pub fn emit_remote_track(&self, track: MockTrack) {
        self.inner.sink.remote_track(track);
    }

    fn record(&self, call: PeerCall) {
        self.inner.journal.borrow_mut().push(call);
    }

    fn fails(&self, check: impl Fn(&PeerScript) -> bool) -> bool {
        check(&self.inner.script.borrow())
    }
}

#[async_trait(?Send)]
impl PeerConnection for MockPeer {
    type LocalTrack = MockTrack;
    type RemoteTrack = MockTrack;

    async fn add_send_only_track(&self, track: &MockTrack) -> Result<(), PlatformError> {
        self.record(PeerCall::AddSendOnly { track: track.id() });
        Ok(())
    }

    async fn add_recv_only_transceiver(&self, kind: MediaKind) -> Result<(), PlatformError> {
        self.record(PeerCall::AddRecvOnly(kind));
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, PlatformError> {
        self.record(PeerCall::CreateOffer);
        let gate = self.inner.script.borrow_mut().offer_gate.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(SessionDescription::offer(format!(
            "v=0\r\no=- {} 0 IN IP4 127.0.0.1\r\n",
            self.inner.seq
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PlatformError> {
        self.record(PeerCall::CreateAnswer);
        Ok(SessionDescription::answer(format!(
            "v=0\r\no=- {} 1 IN IP4 127.0.0.1\r\n",
            self.inner.seq
        )))
    }

    async fn set_local_description(&self, desc: &SessionDescription) -> Result<(), PlatformError> {
        self.record(PeerCall::SetLocal(desc.kind));
        if self.fails(|s| s.fail_set_local) {
            return Err(PlatformError::named("InvalidStateError", "set local rejected"));
        }
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: &SessionDescription,
    ) -> Result<(), PlatformError> {
        self.record(PeerCall::SetRemote(desc.kind));
        if self.fails(|s| s.fail_set_remote) {
            return Err(PlatformError::named("InvalidAccessError", "set remote rejected"));
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), PlatformError> {
        self.record(PeerCall::AddCandidate(candidate.candidate.clone()));
        if self.fails(|s| s.reject_candidates) {
            return Err(PlatformError::named("OperationError", "candidate rejected"));
        }
        Ok(())
    }

    async fn close(&self) {
        self.record(PeerCall::Close);
        self.inner.closes.set(self.inner.closes.get() + 1);
    }
}

#[derive(Clone, Default)]
pub struct MockPeerFactory {
    script: Rc<RefCell<PeerScript>>,
    created: Rc<RefCell<Vec<MockPeer>>>,
}

impl MockPeerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> std::cell::RefMut<'_, PeerScript> {
        self.script.borrow_mut()
    }

    pub fn peers(&self) -> Vec<MockPeer> {
        self.created.borrow().clone()
    }

    /// Most recently created connection for `role`.
    pub fn peer(&self, role: ConnectionRole) -> Option<MockPeer> {
        self.created
            .borrow()
            .iter()
            .rev()
            .find(|p| p.role() == role)
            .cloned()
    }

    pub fn count(&self, role: ConnectionRole) -> usize {
        self.created.borrow().iter().filter(|p| p.role() == role).count()
    }
}

#[async_trait(?Send)]
impl PeerFactory for MockPeerFactory {
    type Connection = MockPeer;

    async fn create(&self, sink: PeerEventSink<MockTrack>) -> Result<MockPeer, PlatformError> {
        if self.script.borrow().fail_create {
            return Err(PlatformError::new("peer connection unavailable"));
        }

        let peer = MockPeer {
            inner: Rc::new(MockPeerInner {
                seq: self.created.borrow().len(),
                sink,
                journal: RefCell::new(Vec::new()),
                closes: Cell::new(0),
                script: self.script.clone(),
            }),
        };
        self.created.borrow_mut().push(peer.clone());
        Ok(peer)
    }
}
