mod connection;
mod factory;
mod transport_config;

pub use connection::{NativePeerConnection, NativeRemoteTrack};
pub use factory::NativePeerFactory;
pub use transport_config::TransportConfig;
