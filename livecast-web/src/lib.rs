mod error;
mod hook;
mod media;
mod peer;
mod signaling;

pub mod logger;

pub use hook::LivecastHook;
pub use media::{WebDevices, WebStream, WebTrack};
pub use peer::{WebPeerConnection, WebPeerFactory};
pub use signaling::JsSignaling;

pub type WebSession = livecast_engine::StreamingSession<WebDevices, WebPeerFactory>;
