use std::cell::RefCell;
use std::rc::Rc;

use livecast_engine::SignalingAdapter;
use serde_json::Value;

/// Records outbound signaling so a test can play the far end.
#[derive(Clone, Default)]
pub struct SignalLog {
    sent: Rc<RefCell<Vec<(String, Value)>>>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapter(&self) -> Rc<dyn SignalingAdapter> {
        Rc::new(self.clone())
    }

    /// `data` of every message of `message_type` on `channel`, oldest first.
    pub fn data_of(&self, channel: &str, message_type: &str) -> Vec<Value> {
        self.sent
            .borrow()
            .iter()
            .filter(|(c, p)| c == channel && p["type"] == message_type)
            .map(|(_, p)| p["data"].clone())
            .collect()
    }
}

impl SignalingAdapter for SignalLog {
    fn send(&self, event: &str, payload: Value) {
        tracing::debug!("[SignalLog] {} -> {}", event, payload["type"]);
        self.sent.borrow_mut().push((event.to_string(), payload));
    }
}
