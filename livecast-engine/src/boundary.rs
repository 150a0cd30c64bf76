use livecast_core::{Channel, ControlSignal, StreamingMode};
use serde_json::Value;

/// Inbound event from the external boundary, classified by name.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryEvent {
    Control(ControlSignal),
    Signal { channel: Channel, message: Value },
}

impl BoundaryEvent {
    /// `None` for names that are neither a control signal nor a signaling channel.
    ///
    /// Channels are accepted regardless of mode; the session decides whether the
    /// channel addresses one of its controllers.
    pub fn parse(mode: StreamingMode, name: &str, payload: Value) -> Option<Self> {
        if let Some(signal) = ControlSignal::parse(mode, name) {
            return Some(BoundaryEvent::Control(signal));
        }
        Channel::from_name(name).map(|channel| BoundaryEvent::Signal {
            channel,
            message: payload,
        })
    }
}
