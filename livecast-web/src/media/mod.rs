mod constraints;
mod devices;

pub use devices::WebDevices;

use livecast_core::MediaKind;
use livecast_engine::{MediaStream, MediaTrack};
use wasm_bindgen::JsCast;

#[derive(Debug, Clone)]
pub struct WebTrack(web_sys::MediaStreamTrack);

impl WebTrack {
    pub fn new(track: web_sys::MediaStreamTrack) -> Self {
        Self(track)
    }

    pub fn inner(&self) -> &web_sys::MediaStreamTrack {
        &self.0
    }
}

impl MediaTrack for WebTrack {
    fn id(&self) -> String {
        self.0.id()
    }

    fn kind(&self) -> MediaKind {
        MediaKind::parse(&self.0.kind()).unwrap_or(MediaKind::Video)
    }

    fn stop(&self) {
        self.0.stop();
    }
}

#[derive(Debug, Clone)]
pub struct WebStream(web_sys::MediaStream);

impl WebStream {
    pub fn new(stream: web_sys::MediaStream) -> Self {
        Self(stream)
    }

    /// The underlying stream, for assigning to a `<video>` element's `srcObject`.
    pub fn inner(&self) -> &web_sys::MediaStream {
        &self.0
    }
}

impl MediaStream for WebStream {
    type Track = WebTrack;

    fn id(&self) -> String {
        self.0.id()
    }

    fn tracks(&self) -> Vec<WebTrack> {
        self.0
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<web_sys::MediaStreamTrack>().ok())
            .map(WebTrack)
            .collect()
    }
}
