use std::cell::RefCell;
use std::rc::Rc;

use livecast_engine::SignalingAdapter;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SentSignal {
    pub channel: String,
    pub payload: Value,
}

impl SentSignal {
    pub fn message_type(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }
}

/// Mock SignalingAdapter that records every outbound message.
#[derive(Clone, Default)]
pub struct MockSignaling {
    sent: Rc<RefCell<Vec<SentSignal>>>,
}

impl MockSignaling {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapter(&self) -> Rc<dyn SignalingAdapter> {
        Rc::new(self.clone())
    }

    pub fn sent(&self) -> Vec<SentSignal> {
        self.sent.borrow().clone()
    }

    /// Payloads of the given `type` sent on `channel`, oldest first.
    pub fn of_type(&self, channel: &str, message_type: &str) -> Vec<Value> {
        self.sent
            .borrow()
            .iter()
            .filter(|s| s.channel == channel && s.message_type() == Some(message_type))
            .map(|s| s.payload.clone())
            .collect()
    }

    pub fn count(&self, channel: &str, message_type: &str) -> usize {
        self.of_type(channel, message_type).len()
    }

    /// `data` of the most recent message of the given type on `channel`.
    pub fn last_data(&self, channel: &str, message_type: &str) -> Option<Value> {
        self.of_type(channel, message_type)
            .pop()
            .and_then(|p| p.get("data").cloned())
    }

    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl SignalingAdapter for MockSignaling {
    fn send(&self, event: &str, payload: Value) {
        tracing::debug!("[MockSignaling] {} -> {}", event, payload);
        self.sent.borrow_mut().push(SentSignal {
            channel: event.to_string(),
            payload,
        });
    }
}
