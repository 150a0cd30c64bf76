use async_trait::async_trait;
use livecast_core::{DeviceDescriptor, DeviceKind, PlatformError};
use livecast_engine::{CaptureRequest, MediaDevices};
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::WebStream;
use super::constraints::CaptureConstraints;
use crate::error::platform_error;

/// `navigator.mediaDevices` of the current window.
#[derive(Clone)]
pub struct WebDevices {
    media: web_sys::MediaDevices,
}

impl WebDevices {
    pub fn from_window() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or_else(|| PlatformError::new("no window available"))?;
        let media = window.navigator().media_devices().map_err(platform_error)?;
        Ok(Self { media })
    }
}

#[async_trait(?Send)]
impl MediaDevices for WebDevices {
    type Stream = WebStream;

    async fn get_user_media(&self, request: &CaptureRequest) -> Result<WebStream, PlatformError> {
        let constraints = CaptureConstraints::from_request(request)
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| PlatformError::new(e.to_string()))?;
        let constraints: web_sys::MediaStreamConstraints = constraints.unchecked_into();

        let promise = self
            .media
            .get_user_media_with_constraints(&constraints)
            .map_err(platform_error)?;
        let stream = JsFuture::from(promise).await.map_err(platform_error)?;
        let stream: web_sys::MediaStream = stream
            .dyn_into()
            .map_err(|_| PlatformError::new("getUserMedia did not return a MediaStream"))?;

        debug!("Obtained stream with id: {}", stream.id());
        Ok(WebStream::new(stream))
    }

    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError> {
        let promise = self.media.enumerate_devices().map_err(platform_error)?;
        let list = JsFuture::from(promise).await.map_err(platform_error)?;

        Ok(js_sys::Array::from(&list)
            .iter()
            .filter_map(|info| read_device(&info))
            .collect())
    }
}

/// Reads a `MediaDeviceInfo`, skipping outputs and anything without a known kind.
fn read_device(info: &JsValue) -> Option<DeviceDescriptor> {
    let field = |name: &str| {
        js_sys::Reflect::get(info, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };

    let kind = DeviceKind::parse(&field("kind")?)?;
    let device_id = field("deviceId")?;
    Some(DeviceDescriptor::new(
        kind,
        device_id,
        field("label").unwrap_or_default(),
    ))
}
