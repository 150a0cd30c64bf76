use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc;
use livecast_core::{ControlSignal, MediaConstraints, StreamingMode};
use serde_json::Value;
use tracing::warn;

use crate::boundary::BoundaryEvent;
use crate::peer::CloseFlag;
use crate::session::SessionCommand;

/// Cancellation flag of the streaming attempt currently in flight, if any.
#[derive(Debug, Clone, Default)]
pub struct AttemptSlot(Rc<RefCell<Option<CloseFlag>>>);

impl AttemptSlot {
    pub fn begin(&self) -> CloseFlag {
        let flag = CloseFlag::new();
        *self.0.borrow_mut() = Some(flag.clone());
        flag
    }

    /// Raises the flag so suspended controller operations abort when they resume.
    pub fn cancel(&self) {
        if let Some(flag) = self.0.borrow().as_ref() {
            flag.raise();
        }
    }

    pub fn clear(&self) {
        self.0.borrow_mut().take();
    }
}

/// Cloneable front door to a running [`crate::StreamingSession`].
#[derive(Clone)]
pub struct SessionHandle {
    mode: StreamingMode,
    commands: mpsc::UnboundedSender<SessionCommand>,
    attempt: AttemptSlot,
}

impl SessionHandle {
    pub(crate) fn new(
        mode: StreamingMode,
        commands: mpsc::UnboundedSender<SessionCommand>,
        attempt: AttemptSlot,
    ) -> Self {
        Self {
            mode,
            commands,
            attempt,
        }
    }

    pub fn mode(&self) -> StreamingMode {
        self.mode
    }

    pub fn probe(&self) {
        self.send(SessionCommand::Probe);
    }

    pub fn bring_up(&self) {
        self.send(SessionCommand::BringUp);
    }

    pub fn apply_constraints(&self, constraints: MediaConstraints) {
        self.send(SessionCommand::ApplyConstraints(constraints));
    }

    pub fn start(&self) {
        self.send(SessionCommand::Start(self.mode));
    }

    /// Cancels any in-flight negotiation immediately, then queues the teardown.
    pub fn stop(&self) {
        self.attempt.cancel();
        self.send(SessionCommand::Stop);
    }

    pub fn signal(&self, channel: impl Into<String>, message: Value) {
        self.send(SessionCommand::Signal {
            channel: channel.into(),
            message,
        });
    }

    pub fn shutdown(&self) {
        self.attempt.cancel();
        self.send(SessionCommand::Shutdown);
    }

    /// Entry point for the external event boundary. Returns `false` for unknown event names.
    pub fn handle_event(&self, name: &str, payload: Value) -> bool {
        match BoundaryEvent::parse(self.mode, name, payload) {
            Some(BoundaryEvent::Control(ControlSignal::Start)) => self.start(),
            Some(BoundaryEvent::Control(ControlSignal::Stop)) => self.stop(),
            Some(BoundaryEvent::Signal { channel, message }) => self.signal(channel.name(), message),
            None => {
                warn!("Ignoring unknown boundary event '{}'", name);
                return false;
            }
        }
        true
    }

    fn send(&self, command: SessionCommand) {
        if self.commands.unbounded_send(command).is_err() {
            warn!("Session loop has exited; command dropped");
        }
    }
}
