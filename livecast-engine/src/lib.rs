pub mod boundary;
pub mod device;
pub mod peer;
pub mod platform;
pub mod session;

pub use boundary::BoundaryEvent;
pub use device::DeviceManager;
pub use livecast_core::*;
pub use peer::{CloseFlag, PeerController};
pub use platform::*;
pub use session::*;
