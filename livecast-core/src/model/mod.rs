mod constraints;
mod controller;
mod device;
mod role;
mod signaling;
mod state;

pub use constraints::MediaConstraints;
pub use controller::ControllerId;
pub use device::{DeviceDescriptor, DeviceKind, DeviceList, MediaKind};
pub use role::{ConnectionRole, StreamingMode};
pub use signaling::{
    Channel, ControlSignal, IceCandidate, IceServerConfig, SdpType, SessionDescription,
    SignalEvent,
};
pub use state::{ControllerState, PeerConnectionState};
