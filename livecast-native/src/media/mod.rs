mod synthetic_devices;
mod track;

pub use synthetic_devices::SyntheticDevices;
pub use track::{NativeStream, NativeTrack};
