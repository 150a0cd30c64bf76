use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc;
use livecast_core::{
    Channel, ConnectionRole, ControllerError, ControllerState, DeviceList, MediaConstraints,
    SessionError, SignalEvent, StreamingMode,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::device::DeviceManager;
use crate::peer::{ControllerOutput, PeerController};
use crate::platform::{
    ConnectionOf, MediaDevices, MediaStream, PeerConnection, PeerFactory, RemoteTrackOf,
    SignalingAdapter, StreamOf, TaggedPeerEvent, TrackOf,
};
use crate::session::{
    AttemptSlot, Controllers, SessionCommand, SessionConfig, SessionEvent, SessionHandle,
};

type EventOf<D, F> = SessionEvent<StreamOf<D>, RemoteTrackOf<F>>;

enum Incoming<R> {
    Command(Option<SessionCommand>),
    Platform(Option<TaggedPeerEvent<R>>),
}

/// Route chosen for an inbound signaling message before touching a controller.
enum Route {
    RemoteAnswer,
    RemoteOffer,
    Candidate,
}

/// Orchestrates one (publisher) or two (echo) controllers over one capture.
///
/// The session is the only place controllers are created or closed. It can be
/// driven directly through its async methods, or moved into [`StreamingSession::run`]
/// and fed through a [`SessionHandle`].
pub struct StreamingSession<D, F>
where
    D: MediaDevices,
    F: PeerFactory,
    F::Connection: PeerConnection<LocalTrack = TrackOf<D>>,
{
    mode: StreamingMode,
    devices: DeviceManager<D>,
    factory: F,
    signaling: Rc<dyn SignalingAdapter>,
    constraints: MediaConstraints,
    active: Option<StreamingMode>,
    established: bool,
    controllers: Controllers<ConnectionOf<F>>,
    attempt: AttemptSlot,
    events: mpsc::UnboundedSender<EventOf<D, F>>,
    platform_tx: mpsc::UnboundedSender<TaggedPeerEvent<RemoteTrackOf<F>>>,
    platform_rx: mpsc::UnboundedReceiver<TaggedPeerEvent<RemoteTrackOf<F>>>,
    commands_tx: mpsc::UnboundedSender<SessionCommand>,
    commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
}

impl<D, F> StreamingSession<D, F>
where
    D: MediaDevices,
    F: PeerFactory,
    F::Connection: PeerConnection<LocalTrack = TrackOf<D>>,
{
    pub fn new(
        config: SessionConfig,
        devices: D,
        factory: F,
        signaling: Rc<dyn SignalingAdapter>,
    ) -> (Self, mpsc::UnboundedReceiver<EventOf<D, F>>) {
        let (events, events_rx) = mpsc::unbounded();
        let (platform_tx, platform_rx) = mpsc::unbounded();
        let (commands_tx, commands_rx) = mpsc::unbounded();

        let session = Self {
            mode: config.mode,
            devices: DeviceManager::new(devices),
            factory,
            signaling,
            constraints: config.constraints,
            active: None,
            established: false,
            controllers: Controllers::default(),
            attempt: AttemptSlot::default(),
            events,
            platform_tx,
            platform_rx,
            commands_tx,
            commands_rx,
        };
        (session, events_rx)
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.mode, self.commands_tx.clone(), self.attempt.clone())
    }

    pub fn mode(&self) -> StreamingMode {
        self.mode
    }

    pub fn constraints(&self) -> &MediaConstraints {
        &self.constraints
    }

    pub fn devices(&self) -> &DeviceManager<D> {
        &self.devices
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// True once every leg of the active attempt reported `Connected`.
    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn controller(&self, role: ConnectionRole) -> Option<&PeerController<ConnectionOf<F>>> {
        self.controllers.get(role)
    }

    pub fn controller_state(&self, role: ConnectionRole) -> Option<ControllerState> {
        self.controllers.get(role).map(|c| c.state())
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Remote candidates still waiting for a remote description, across all legs.
    pub fn pending_candidates(&self) -> usize {
        self.controllers.iter().map(|c| c.pending_candidates()).sum()
    }

    /// Enumerates devices and reports them as `DevicesChanged`.
    ///
    /// Probing releases the held capture, so it is rejected while streaming.
    pub async fn probe(&mut self) -> Result<DeviceList, SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyStreaming);
        }
        self.refresh_devices().await
    }

    /// Initial setup: probe, pin the first audio and video device if none is chosen, capture.
    pub async fn bring_up(&mut self) -> Result<(), SessionError> {
        let devices = self.probe().await?;

        let mut constraints = self.constraints.clone();
        if constraints.audio_device_id().is_none() {
            if let Some(mic) = devices.audio().next() {
                constraints = constraints.with_audio_device(mic.device_id.clone());
            }
        }
        if constraints.video_device_id().is_none() {
            if let Some(cam) = devices.video().next() {
                constraints = constraints.with_video_device(cam.device_id.clone());
            }
        }

        self.apply_constraints(constraints).await?;
        Ok(())
    }

    /// Replaces the settings snapshot and re-captures with it.
    pub async fn apply_constraints(
        &mut self,
        constraints: MediaConstraints,
    ) -> Result<StreamOf<D>, SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyStreaming);
        }

        self.constraints = constraints;
        let stream = self.devices.acquire(&self.constraints).await?;
        self.emit(SessionEvent::PreviewReady(stream.clone()));
        Ok(stream)
    }

    /// Opens the controllers for `mode` against the held capture and sends the source offer.
    ///
    /// In echo mode the sink controller is left in `New`, waiting for the remote offer.
    pub async fn start(&mut self, mode: StreamingMode) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyStreaming);
        }
        let Some(stream) = self.devices.stream().cloned() else {
            return Err(SessionError::NoStream);
        };

        info!("Starting {} session with stream {}", mode, stream.id());
        let cancel = self.attempt.begin();
        self.active = Some(mode);
        self.established = false;

        let tracks = stream.tracks();
        for &role in mode.roles() {
            let Some(channel) = Channel::for_role(mode, role) else {
                continue;
            };
            let opened = PeerController::open(
                &self.factory,
                role,
                channel,
                &tracks,
                self.signaling.clone(),
                self.platform_tx.clone(),
                cancel.clone(),
            )
            .await;

            match opened {
                Ok(controller) => {
                    self.controllers.insert(controller);
                }
                Err(e) => return Err(self.abort_start(e).await),
            }
        }

        self.emit(SessionEvent::StreamingStarted(mode));
        for &role in mode.roles() {
            self.emit_state(role);
        }

        let offered = match self.controllers.get_mut(ConnectionRole::Source) {
            Some(source) => source.create_and_send_offer().await,
            None => Ok(()),
        };
        match offered {
            Ok(()) => {
                self.emit_state(ConnectionRole::Source);
                Ok(())
            }
            Err(e) => Err(self.abort_start(e).await),
        }
    }

    /// Closes every controller, then re-probes devices. No-op when idle.
    ///
    /// After a stop no capture is held; a new `apply_constraints` is needed before
    /// the next `start`.
    pub async fn stop(&mut self) -> Result<(), SessionError> {
        if self.active.is_none() && self.controllers.is_empty() {
            debug!("Stop requested while idle");
            return Ok(());
        }

        info!("Stopping streaming session");
        self.teardown().await;
        self.emit(SessionEvent::StreamingStopped);
        self.refresh_devices().await?;
        Ok(())
    }

    /// Routes an inbound `{type, data}` message to the controller addressed by `channel`.
    ///
    /// Messages that arrive while idle are stale and dropped. Unknown channels, unknown
    /// types and role mismatches produce a `Warning` and change nothing.
    pub async fn on_signaling_message(
        &mut self,
        channel: &str,
        message: Value,
    ) -> Result<(), SessionError> {
        let Some(mode) = self.active else {
            warn!("Discarding message on {}: no active session", channel);
            return Ok(());
        };
        let Some(role) = Channel::from_name(channel).and_then(|c| c.role_in(mode)) else {
            self.warning(format!("channel '{channel}' is not used in {mode} mode"));
            return Ok(());
        };
        let event: SignalEvent = match serde_json::from_value(message) {
            Ok(event) => event,
            Err(e) => {
                self.warning(format!("unrecognised message on {channel}: {e}"));
                return Ok(());
            }
        };

        let route = match (&event, role) {
            (SignalEvent::SdpAnswer(_), ConnectionRole::Source) => Route::RemoteAnswer,
            (SignalEvent::SdpOffer(_), ConnectionRole::Sink) => Route::RemoteOffer,
            (SignalEvent::IceCandidate(_), _) => Route::Candidate,
            (other, role) => {
                self.warning(format!(
                    "{} is not valid for the {} connection",
                    other.type_name(),
                    role
                ));
                return Ok(());
            }
        };

        let Some(controller) = self.controllers.get_mut(role) else {
            warn!("No {} controller for {}", role, event.type_name());
            return Ok(());
        };
        let before = controller.state();

        let result = match (route, event) {
            (Route::RemoteAnswer, SignalEvent::SdpAnswer(desc)) => {
                controller.accept_remote_answer(desc).await
            }
            (Route::RemoteOffer, SignalEvent::SdpOffer(desc)) => {
                controller.accept_remote_offer(desc).await
            }
            (Route::Candidate, SignalEvent::IceCandidate(candidate)) => {
                controller.add_remote_candidate(candidate).await
            }
            _ => Ok(()),
        };
        let after = controller.state();
        let diagnostics = controller.take_diagnostics();

        for diagnostic in diagnostics {
            self.warning(diagnostic);
        }

        match result {
            Ok(()) => {
                if before != after {
                    self.emit_state(role);
                }
                Ok(())
            }
            Err(ControllerError::CandidateRejected { message, .. }) => {
                self.warning(format!("{role} rejected remote candidate: {message}"));
                Ok(())
            }
            Err(ControllerError::ClosedConnection { .. }) => {
                debug!("{} controller closed while handling message", role);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.fail_session(reason.clone()).await;
                Err(SessionError::SessionFailed(reason))
            }
        }
    }

    /// Applies one platform event. Events from controllers that are no longer owned are dropped.
    pub async fn handle_platform_event(&mut self, tagged: TaggedPeerEvent<RemoteTrackOf<F>>) {
        let role = tagged.role;
        let Some(controller) = self.controllers.get_mut(role) else {
            debug!("Dropping {} platform event: no live controller", role);
            return;
        };
        if controller.id() != tagged.controller {
            debug!("Dropping stale event from controller {}", tagged.controller);
            return;
        }

        match controller.handle_platform_event(tagged.event) {
            ControllerOutput::Ignored => {}
            ControllerOutput::RemoteTrack(track) => self.emit(SessionEvent::RemoteTrack(track)),
            ControllerOutput::StateChanged(state) => {
                self.emit(SessionEvent::ControllerState { role, state });
                match state {
                    ControllerState::Failed => {
                        self.fail_session(format!("{role} connection failed")).await;
                    }
                    ControllerState::Connected => self.check_established(),
                    _ => {}
                }
            }
        }
    }

    /// Waits for the next platform event and applies it. Returns `false` if the channel closed.
    pub async fn process_next_platform_event(&mut self) -> bool {
        match self.platform_rx.next().await {
            Some(tagged) => {
                self.handle_platform_event(tagged).await;
                true
            }
            None => false,
        }
    }

    /// Handles one queued command. Returns `false` when the loop should exit.
    pub async fn handle_command(&mut self, command: SessionCommand) -> bool {
        let result = match command {
            SessionCommand::Probe => self.probe().await.map(|_| ()),
            SessionCommand::BringUp => self.bring_up().await,
            SessionCommand::ApplyConstraints(constraints) => {
                self.apply_constraints(constraints).await.map(|_| ())
            }
            SessionCommand::Start(mode) => self.start(mode).await,
            SessionCommand::Stop => self.stop().await,
            SessionCommand::Signal { channel, message } => {
                self.on_signaling_message(&channel, message).await
            }
            SessionCommand::Shutdown => {
                self.teardown().await;
                self.devices.release();
                return false;
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
        true
    }

    /// Processes queued commands and platform events until both queues are empty.
    pub async fn run_until_idle(&mut self) {
        loop {
            if let Ok(Some(command)) = self.commands_rx.try_next() {
                if !self.handle_command(command).await {
                    return;
                }
                continue;
            }
            if let Ok(Some(tagged)) = self.platform_rx.try_next() {
                self.handle_platform_event(tagged).await;
                continue;
            }
            return;
        }
    }

    /// Session loop: one command or platform event at a time until shutdown.
    pub async fn run(mut self) {
        info!("Streaming session loop started ({} mode)", self.mode);

        loop {
            let incoming = {
                let commands = &mut self.commands_rx;
                let platform = &mut self.platform_rx;
                futures::select! {
                    command = commands.next() => Incoming::Command(command),
                    tagged = platform.next() => Incoming::Platform(tagged),
                }
            };

            match incoming {
                Incoming::Command(Some(command)) => {
                    if !self.handle_command(command).await {
                        break;
                    }
                }
                Incoming::Command(None) => {
                    info!("Command channel closed. Shutting down session.");
                    break;
                }
                Incoming::Platform(Some(tagged)) => self.handle_platform_event(tagged).await,
                Incoming::Platform(None) => {
                    warn!("Platform event channel closed unexpectedly");
                    break;
                }
            }
        }

        self.teardown().await;
        self.devices.release();
        info!("Streaming session loop finished");
    }

    async fn abort_start(&mut self, err: ControllerError) -> SessionError {
        if matches!(err, ControllerError::ClosedConnection { .. }) {
            info!("Start aborted: attempt was stopped mid-negotiation");
            return SessionError::Cancelled;
        }
        let reason = err.to_string();
        self.fail_session(reason.clone()).await;
        SessionError::SessionFailed(reason)
    }

    /// Tears the whole attempt down and reports `SessionFailed`.
    ///
    /// Only the first failure of an attempt is reported; later ones find no active
    /// attempt and return `false`.
    async fn fail_session(&mut self, reason: String) -> bool {
        if self.active.is_none() {
            debug!("Ignoring failure after teardown: {}", reason);
            return false;
        }

        error!("Streaming session failed: {}", reason);
        self.teardown().await;
        self.emit(SessionEvent::SessionFailed(reason));
        self.emit(SessionEvent::StreamingStopped);

        if let Err(e) = self.refresh_devices().await {
            self.report(e);
        }
        true
    }

    async fn refresh_devices(&mut self) -> Result<DeviceList, SessionError> {
        let devices = self.devices.probe().await?;
        self.emit(SessionEvent::DevicesChanged(devices.clone()));
        Ok(devices)
    }

    async fn teardown(&mut self) {
        self.attempt.cancel();
        self.attempt.clear();
        self.active = None;
        self.established = false;

        for mut controller in self.controllers.take_all() {
            controller.close().await;
            self.emit(SessionEvent::ControllerState {
                role: controller.role(),
                state: controller.state(),
            });
        }
    }

    fn check_established(&mut self) {
        let Some(mode) = self.active else {
            return;
        };
        if self.established {
            return;
        }
        let all_connected = mode
            .roles()
            .iter()
            .all(|role| self.controller_state(*role) == Some(ControllerState::Connected));
        if all_connected {
            info!("All {} legs connected", mode);
            self.established = true;
            self.emit(SessionEvent::Established);
        }
    }

    fn report(&self, err: SessionError) {
        match err {
            SessionError::SessionFailed(_) => {}
            SessionError::Cancelled => debug!("Streaming attempt cancelled"),
            other => {
                error!("{}", other);
                self.emit(SessionEvent::Error(other.to_string()));
            }
        }
    }

    fn emit_state(&self, role: ConnectionRole) {
        if let Some(state) = self.controller_state(role) {
            self.emit(SessionEvent::ControllerState { role, state });
        }
    }

    fn warning(&self, message: String) {
        warn!("{}", message);
        self.emit(SessionEvent::Warning(message));
    }

    fn emit(&self, event: EventOf<D, F>) {
        // The host may have dropped its receiver; reports are best-effort past that point.
        let _ = self.events.unbounded_send(event);
    }
}
