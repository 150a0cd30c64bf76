use livecast_engine::SignalingAdapter;
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use wasm_bindgen::JsValue;

/// Pushes outbound `{type, data}` messages through the host's `pushEvent(name, payload)`.
pub struct JsSignaling {
    push_event: js_sys::Function,
}

impl JsSignaling {
    pub fn new(push_event: js_sys::Function) -> Self {
        Self { push_event }
    }
}

impl SignalingAdapter for JsSignaling {
    fn send(&self, event: &str, payload: Value) {
        let js = match payload.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(js) => js,
            Err(e) => {
                error!("Failed to convert {} payload: {}", event, e);
                return;
            }
        };
        if let Err(e) = self
            .push_event
            .call2(&JsValue::NULL, &JsValue::from_str(event), &js)
        {
            error!("pushEvent({}) threw: {:?}", event, e);
        }
    }
}
