use std::cell::RefCell;
use std::rc::Rc;

use futures::StreamExt;
use futures::channel::mpsc;
use livecast_core::{DeviceList, MediaConstraints, StreamingMode};
use livecast_engine::{SessionConfig, SessionEvent, SessionHandle, StreamingSession};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{Level, info, warn};
use wasm_bindgen::prelude::*;

use crate::logger::Logger;
use crate::media::{WebDevices, WebStream, WebTrack};
use crate::peer::WebPeerFactory;
use crate::signaling::JsSignaling;
use crate::WebSession;

type WebEvent = SessionEvent<WebStream, WebTrack>;

struct HookCallbacks<F = js_sys::Function> {
    on_preview: Option<F>,
    on_remote_stream: Option<F>,
    on_devices: Option<F>,
    on_status: Option<F>,
}

impl<F> Default for HookCallbacks<F> {
    fn default() -> Self {
        Self {
            on_preview: None,
            on_remote_stream: None,
            on_devices: None,
            on_status: None,
        }
    }
}

impl<F: Clone> HookCallbacks<F> {
    /// Clones one slot out so the borrow ends before the callback runs; handlers may
    /// re-register callbacks from inside themselves.
    fn pick(cell: &RefCell<Self>, slot: impl Fn(&Self) -> &Option<F>) -> Option<F> {
        slot(&*cell.borrow()).clone()
    }
}

/// Browser-facing wrapper: the page constructs one per mounted view, forwards
/// `handleEvent` traffic into it and receives `{type, data}` messages through `pushEvent`.
///
/// When streaming stops or fails the hook re-captures with the current settings, so
/// the preview comes back and the next start needs no `applySettings` call.
#[wasm_bindgen]
pub struct LivecastHook {
    handle: SessionHandle,
    pending: Option<(WebSession, mpsc::UnboundedReceiver<WebEvent>)>,
    callbacks: Rc<RefCell<HookCallbacks>>,
}

#[wasm_bindgen]
impl LivecastHook {
    /// `mode` is `"echo"` or `"publisher"`. `config` may carry `iceServers` and `constraints`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mode: &str,
        push_event: js_sys::Function,
        config: JsValue,
    ) -> Result<LivecastHook, JsValue> {
        Logger::init(Level::INFO);

        let mode = match mode {
            "echo" => StreamingMode::Echo,
            "publisher" => StreamingMode::Publisher,
            other => return Err(JsValue::from_str(&format!("unknown streaming mode '{other}'"))),
        };
        let mut config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.mode = mode;

        let devices = WebDevices::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let factory = WebPeerFactory::new(config.ice_servers.clone());
        let signaling = Rc::new(JsSignaling::new(push_event));

        let (session, events) = StreamingSession::new(config, devices, factory, signaling);
        Ok(LivecastHook {
            handle: session.handle(),
            pending: Some((session, events)),
            callbacks: Rc::new(RefCell::new(HookCallbacks::default())),
        })
    }

    /// Called with the local `MediaStream` each time capture is (re)acquired.
    #[wasm_bindgen(js_name = onPreview)]
    pub fn on_preview(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_preview = Some(callback);
    }

    /// Echo mode only: called once per attempt with the stream remote tracks are added to.
    #[wasm_bindgen(js_name = onRemoteStream)]
    pub fn on_remote_stream(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_remote_stream = Some(callback);
    }

    /// Called with `{audio: [...], video: [...]}` after every probe.
    #[wasm_bindgen(js_name = onDevices)]
    pub fn on_devices(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_devices = Some(callback);
    }

    /// Called with `{kind, ...}` for lifecycle changes, warnings and errors.
    #[wasm_bindgen(js_name = onStatus)]
    pub fn on_status(&self, callback: js_sys::Function) {
        self.callbacks.borrow_mut().on_status = Some(callback);
    }

    /// Starts the session loop, then probes devices and captures with the first of each kind.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        let Some((session, events)) = self.pending.take() else {
            return Err(JsValue::from_str("hook is already mounted"));
        };

        let mode = self.handle.mode();
        info!("Mounting {} hook", mode);
        wasm_bindgen_futures::spawn_local(session.run());
        wasm_bindgen_futures::spawn_local(dispatch(
            events,
            self.callbacks.clone(),
            self.handle.clone(),
        ));

        self.handle.bring_up();
        Ok(())
    }

    /// Forwards a server event. Returns `false` if the name is not part of this hook's boundary.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&self, name: &str, payload: JsValue) -> Result<bool, JsValue> {
        let payload: Value = if payload.is_undefined() || payload.is_null() {
            Value::Null
        } else {
            serde_wasm_bindgen::from_value(payload)?
        };
        Ok(self.handle.handle_event(name, payload))
    }

    /// Re-captures with the given settings; rejected while streaming.
    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(&self, settings: JsValue) -> Result<(), JsValue> {
        let constraints: MediaConstraints = serde_wasm_bindgen::from_value(settings)?;
        self.handle.apply_constraints(constraints);
        Ok(())
    }

    /// Re-lists devices; rejected while streaming since probing releases the capture.
    #[wasm_bindgen(js_name = refreshDevices)]
    pub fn refresh_devices(&self) {
        self.handle.probe();
    }

    pub fn destroyed(&self) {
        self.handle.shutdown();
    }
}

async fn dispatch(
    mut events: mpsc::UnboundedReceiver<WebEvent>,
    callbacks: Rc<RefCell<HookCallbacks>>,
    handle: SessionHandle,
) {
    let mode = handle.mode();
    let mut remote: Option<web_sys::MediaStream> = None;

    while let Some(event) = events.next().await {
        let cbs = &*callbacks;
        match event {
            SessionEvent::PreviewReady(stream) => {
                call(HookCallbacks::pick(cbs, |c| &c.on_preview), stream.inner());
            }
            SessionEvent::DevicesChanged(list) => {
                if let Some(js) = to_js(&device_options(&list)) {
                    call(HookCallbacks::pick(cbs, |c| &c.on_devices), &js);
                }
            }
            SessionEvent::StreamingStarted(started) => {
                if mode == StreamingMode::Echo {
                    match web_sys::MediaStream::new() {
                        Ok(stream) => {
                            call(HookCallbacks::pick(cbs, |c| &c.on_remote_stream), &stream);
                            remote = Some(stream);
                        }
                        Err(e) => Logger::error(&e),
                    }
                }
                status(cbs, json!({"kind": "started", "mode": started}));
            }
            SessionEvent::RemoteTrack(track) => match &remote {
                Some(stream) => stream.add_track(track.inner()),
                None => warn!("Remote track {} arrived without a remote stream", track.inner().id()),
            },
            SessionEvent::StreamingStopped => {
                remote = None;
                status(cbs, json!({"kind": "stopped"}));
                // Stopping released the capture.
                handle.bring_up();
            }
            SessionEvent::Established => status(cbs, json!({"kind": "established"})),
            SessionEvent::ControllerState { role, state } => status(
                cbs,
                json!({"kind": "controller_state", "role": role, "state": state}),
            ),
            SessionEvent::SessionFailed(reason) => {
                status(cbs, json!({"kind": "failed", "message": reason}))
            }
            SessionEvent::Warning(message) => {
                status(cbs, json!({"kind": "warning", "message": message}))
            }
            SessionEvent::Error(message) => {
                status(cbs, json!({"kind": "error", "message": message}))
            }
        }
    }
}

/// Select-box options, falling back to `"{kind} ({deviceId})"` for unlabeled devices.
fn device_options(list: &DeviceList) -> Value {
    let options = |devices: Vec<&livecast_core::DeviceDescriptor>| {
        devices
            .into_iter()
            .map(|d| json!({"deviceId": d.device_id, "label": d.display_label()}))
            .collect::<Vec<_>>()
    };
    json!({
        "audio": options(list.audio().collect()),
        "video": options(list.video().collect()),
    })
}

fn status(callbacks: &RefCell<HookCallbacks>, report: Value) {
    if let Some(js) = to_js(&report) {
        call(HookCallbacks::pick(callbacks, |c| &c.on_status), &js);
    }
}

fn to_js(value: &Value) -> Option<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| warn!("Failed to convert UI payload: {}", e))
        .ok()
}

fn call(callback: Option<js_sys::Function>, arg: &JsValue) {
    if let Some(cb) = callback {
        if let Err(e) = cb.call1(&JsValue::NULL, arg) {
            Logger::error(&e);
        }
    }
}
