//! webrtc-rs binding for the streaming engine.
//!
//! The engine is single-threaded, so sessions built from these types must be driven
//! on a current-thread runtime or inside a `tokio::task::LocalSet`. webrtc-rs itself
//! spawns its transport tasks on the ambient tokio runtime.

mod error;
pub mod media;
pub mod transport;

pub use media::{NativeStream, NativeTrack, SyntheticDevices};
pub use transport::{NativePeerConnection, NativePeerFactory, NativeRemoteTrack, TransportConfig};

pub type NativeSession = livecast_engine::StreamingSession<SyntheticDevices, NativePeerFactory>;
