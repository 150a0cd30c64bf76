use livecast_core::PlatformError;
use wasm_bindgen::{JsCast, JsValue};

/// Converts a rejected promise or thrown value into a [`PlatformError`], keeping the DOM name.
pub(crate) fn platform_error(err: JsValue) -> PlatformError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        return PlatformError::named(dom.name(), dom.message());
    }
    if let Some(js) = err.dyn_ref::<js_sys::Error>() {
        return PlatformError::named(String::from(js.name()), String::from(js.message()));
    }
    PlatformError::new(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
