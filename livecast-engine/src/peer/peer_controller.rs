use std::rc::Rc;

use futures::channel::mpsc;
use livecast_core::{
    Channel, ConnectionRole, ControllerError, ControllerId, ControllerState, IceCandidate,
    MediaKind, PeerConnectionState, PlatformError, SessionDescription, SignalEvent,
};
use tracing::{debug, error, info, warn};

use crate::peer::{CandidateQueue, CloseFlag};
use crate::platform::{
    PeerConnection, PeerEvent, PeerEventSink, PeerFactory, SignalingAdapter, TaggedPeerEvent,
};

/// What the owning session has to act on after a platform event.
#[derive(Debug)]
pub enum ControllerOutput<R> {
    Ignored,
    RemoteTrack(R),
    StateChanged(ControllerState),
}

/// Drives negotiation for exactly one peer connection.
///
/// A controller is single-use: once closed it rejects every operation, and a new
/// negotiation always allocates a new controller with a new [`ControllerId`].
pub struct PeerController<C: PeerConnection> {
    id: ControllerId,
    role: ConnectionRole,
    channel: Channel,
    connection: C,
    state: ControllerState,
    candidates: CandidateQueue,
    remote_applied: bool,
    closed: CloseFlag,
    cancel: CloseFlag,
    signaling: Rc<dyn SignalingAdapter>,
    diagnostics: Vec<String>,
}

impl<C: PeerConnection> PeerController<C> {
    /// Allocates the connection and declares its transceivers.
    ///
    /// Source controllers attach every supplied track send-only. Sink controllers
    /// ignore `local_tracks` and declare recv-only audio and video.
    pub async fn open<F>(
        factory: &F,
        role: ConnectionRole,
        channel: Channel,
        local_tracks: &[C::LocalTrack],
        signaling: Rc<dyn SignalingAdapter>,
        events: mpsc::UnboundedSender<TaggedPeerEvent<C::RemoteTrack>>,
        cancel: CloseFlag,
    ) -> Result<Self, ControllerError>
    where
        F: PeerFactory<Connection = C>,
    {
        let id = ControllerId::new();
        let sink = PeerEventSink::new(id, role, events);

        let connection = factory
            .create(sink)
            .await
            .map_err(|e| ControllerError::Negotiation {
                role,
                message: format!("create peer connection: {e}"),
            })?;

        let attached = match role {
            ConnectionRole::Source => attach_send_only(&connection, local_tracks).await,
            ConnectionRole::Sink => attach_recv_only(&connection).await,
        };
        if let Err(e) = attached {
            connection.close().await;
            return Err(ControllerError::Negotiation {
                role,
                message: format!("declare transceivers: {e}"),
            });
        }

        info!("Opened {} controller {} on {}", role, id, channel.name());

        Ok(Self {
            id,
            role,
            channel,
            connection,
            state: ControllerState::New,
            candidates: CandidateQueue::default(),
            remote_applied: false,
            closed: CloseFlag::new(),
            cancel,
            signaling,
            diagnostics: Vec::new(),
        })
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn role(&self) -> ConnectionRole {
        self.role
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn pending_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Candidate failures collected since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Source: create the local offer, apply it and send it as `sdp_offer`.
    pub async fn create_and_send_offer(&mut self) -> Result<(), ControllerError> {
        const OP: &str = "create an offer";
        self.expect(OP, ConnectionRole::Source, ControllerState::New)?;

        let offer = match self.connection.create_offer().await {
            Ok(offer) => offer,
            Err(e) => return Err(self.negotiation_failed(OP, e)),
        };
        self.ensure_open()?;
        self.state = ControllerState::LocalOfferCreated;

        if let Err(e) = self.connection.set_local_description(&offer).await {
            return Err(self.negotiation_failed("set local offer", e));
        }
        self.ensure_open()?;

        self.emit(SignalEvent::SdpOffer(offer));
        self.state = ControllerState::AwaitingRemoteAnswer;
        info!("{} offer sent, awaiting answer", self.role);
        Ok(())
    }

    /// Sink: apply an externally initiated offer and reply with `sdp_answer`.
    pub async fn accept_remote_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<(), ControllerError> {
        const OP: &str = "accept a remote offer";
        self.expect(OP, ConnectionRole::Sink, ControllerState::New)?;

        if let Err(e) = self.connection.set_remote_description(&offer).await {
            return Err(self.negotiation_failed("set remote offer", e));
        }
        self.ensure_open()?;
        self.state = ControllerState::RemoteOfferReceived;
        self.remote_applied = true;
        self.flush_candidates().await?;

        let answer = match self.connection.create_answer().await {
            Ok(answer) => answer,
            Err(e) => return Err(self.negotiation_failed("create an answer", e)),
        };
        self.ensure_open()?;
        self.state = ControllerState::LocalAnswerCreated;

        if let Err(e) = self.connection.set_local_description(&answer).await {
            return Err(self.negotiation_failed("set local answer", e));
        }
        self.ensure_open()?;

        self.emit(SignalEvent::SdpAnswer(answer));
        self.state = ControllerState::Negotiated;
        info!("{} answer sent", self.role);
        Ok(())
    }

    /// Source: apply the remote answer to our offer.
    pub async fn accept_remote_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<(), ControllerError> {
        const OP: &str = "accept a remote answer";
        self.expect(OP, ConnectionRole::Source, ControllerState::AwaitingRemoteAnswer)?;

        if let Err(e) = self.connection.set_remote_description(&answer).await {
            return Err(self.negotiation_failed("set remote answer", e));
        }
        self.ensure_open()?;
        self.remote_applied = true;
        self.flush_candidates().await?;

        self.state = ControllerState::Negotiated;
        info!("{} remote answer applied", self.role);
        Ok(())
    }

    /// Applies a trickled remote candidate, queueing it until the remote description is set.
    pub async fn add_remote_candidate(
        &mut self,
        candidate: IceCandidate,
    ) -> Result<(), ControllerError> {
        self.ensure_open()?;
        if self.state == ControllerState::Failed {
            return Err(self.unexpected("add a remote candidate"));
        }

        if !self.remote_applied {
            debug!(
                "{} queued remote candidate ({} pending)",
                self.role,
                self.candidates.len() + 1
            );
            self.candidates.push(candidate);
            return Ok(());
        }

        let applied = self.connection.add_ice_candidate(&candidate).await;
        self.ensure_open()?;
        applied.map_err(|e| ControllerError::CandidateRejected {
            role: self.role,
            message: e.message,
        })
    }

    pub fn handle_platform_event(
        &mut self,
        event: PeerEvent<C::RemoteTrack>,
    ) -> ControllerOutput<C::RemoteTrack> {
        if self.is_closed() {
            debug!("{} controller closed, dropping platform event", self.role);
            return ControllerOutput::Ignored;
        }

        match event {
            PeerEvent::LocalCandidate(candidate) => {
                debug!("{} local candidate: {}", self.role, candidate.candidate);
                self.emit(SignalEvent::IceCandidate(candidate));
                ControllerOutput::Ignored
            }

            PeerEvent::RemoteTrack(track) => match self.role {
                ConnectionRole::Sink => ControllerOutput::RemoteTrack(track),
                ConnectionRole::Source => {
                    warn!("Source controller received a remote track; ignoring");
                    ControllerOutput::Ignored
                }
            },

            PeerEvent::ConnectionState(platform) => self.on_connection_state(platform),
        }
    }

    /// Releases the connection. Safe to call repeatedly and from any state.
    pub async fn close(&mut self) {
        if self.state == ControllerState::Closed {
            return;
        }
        self.closed.raise();
        self.candidates.clear();
        self.state = ControllerState::Closed;
        self.connection.close().await;
        info!("{} controller {} closed", self.role, self.id);
    }

    fn on_connection_state(
        &mut self,
        platform: PeerConnectionState,
    ) -> ControllerOutput<C::RemoteTrack> {
        info!("{} connection state: {:?}", self.role, platform);

        match platform {
            PeerConnectionState::Connected => match self.state {
                ControllerState::Negotiated => {
                    self.state = ControllerState::Connected;
                    ControllerOutput::StateChanged(self.state)
                }
                ControllerState::Connected => ControllerOutput::Ignored,
                other => {
                    warn!("{} reported connected while {:?}", self.role, other);
                    ControllerOutput::Ignored
                }
            },

            PeerConnectionState::Failed | PeerConnectionState::Closed => {
                if self.state.is_terminal() {
                    return ControllerOutput::Ignored;
                }
                self.state = ControllerState::Failed;
                ControllerOutput::StateChanged(self.state)
            }

            PeerConnectionState::New
            | PeerConnectionState::Connecting
            | PeerConnectionState::Disconnected => ControllerOutput::Ignored,
        }
    }

    async fn flush_candidates(&mut self) -> Result<(), ControllerError> {
        let queued = self.candidates.drain();
        if !queued.is_empty() {
            debug!("{} flushing {} queued candidates", self.role, queued.len());
        }

        for candidate in queued {
            let applied = self.connection.add_ice_candidate(&candidate).await;
            self.ensure_open()?;
            if let Err(e) = applied {
                warn!("{} rejected queued candidate: {}", self.role, e);
                self.diagnostics.push(format!(
                    "{} rejected candidate {}: {}",
                    self.role, candidate.candidate, e
                ));
            }
        }
        Ok(())
    }

    fn emit(&self, event: SignalEvent) {
        match serde_json::to_value(&event) {
            Ok(payload) => self.signaling.send(self.channel.name(), payload),
            Err(e) => error!("Failed to serialize {}: {}", event.type_name(), e),
        }
    }

    fn is_closed(&self) -> bool {
        self.state == ControllerState::Closed || self.closed.is_raised() || self.cancel.is_raised()
    }

    fn ensure_open(&self) -> Result<(), ControllerError> {
        if self.is_closed() {
            return Err(ControllerError::ClosedConnection { role: self.role });
        }
        Ok(())
    }

    fn expect(
        &self,
        operation: &'static str,
        role: ConnectionRole,
        state: ControllerState,
    ) -> Result<(), ControllerError> {
        self.ensure_open()?;
        if self.role != role || self.state != state {
            return Err(self.unexpected(operation));
        }
        Ok(())
    }

    fn unexpected(&self, operation: &'static str) -> ControllerError {
        ControllerError::UnexpectedMessage {
            role: self.role,
            state: self.state,
            operation,
        }
    }

    fn negotiation_failed(&mut self, operation: &str, err: PlatformError) -> ControllerError {
        if self.is_closed() {
            return ControllerError::ClosedConnection { role: self.role };
        }
        error!("{} failed to {}: {}", self.role, operation, err);
        self.state = ControllerState::Failed;
        ControllerError::Negotiation {
            role: self.role,
            message: format!("{operation}: {err}"),
        }
    }
}

async fn attach_send_only<C: PeerConnection>(
    connection: &C,
    tracks: &[C::LocalTrack],
) -> Result<(), PlatformError> {
    for track in tracks {
        connection.add_send_only_track(track).await?;
    }
    Ok(())
}

async fn attach_recv_only<C: PeerConnection>(connection: &C) -> Result<(), PlatformError> {
    connection.add_recv_only_transceiver(MediaKind::Audio).await?;
    connection.add_recv_only_transceiver(MediaKind::Video).await
}
