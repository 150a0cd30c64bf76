use std::cell::Cell;

use async_trait::async_trait;
use livecast_core::{DeviceDescriptor, DeviceKind, MediaKind, PlatformError};
use livecast_engine::{CaptureRequest, MediaDevices};
use tracing::debug;

use super::{NativeStream, NativeTrack};

pub const SYNTHETIC_AUDIO_DEVICE: &str = "synthetic-audio";
pub const SYNTHETIC_VIDEO_DEVICE: &str = "synthetic-video";

/// Device layer for hosts without capture hardware: one opus and one VP8 source.
///
/// Each capture returns fresh tracks that the caller feeds through
/// [`NativeTrack::write_sample`].
pub struct SyntheticDevices {
    devices: Vec<DeviceDescriptor>,
    issued: Cell<usize>,
}

impl Default for SyntheticDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDevices {
    pub fn new() -> Self {
        Self {
            devices: vec![
                DeviceDescriptor::new(
                    DeviceKind::AudioInput,
                    SYNTHETIC_AUDIO_DEVICE,
                    "Synthetic Opus Source",
                ),
                DeviceDescriptor::new(
                    DeviceKind::VideoInput,
                    SYNTHETIC_VIDEO_DEVICE,
                    "Synthetic VP8 Source",
                ),
            ],
            issued: Cell::new(0),
        }
    }

    fn check_device(&self, kind: DeviceKind, id: Option<&str>) -> Result<(), PlatformError> {
        match id {
            Some(id) if !self.devices.iter().any(|d| d.kind == kind && d.device_id == id) => {
                Err(PlatformError::named(
                    "OverconstrainedError",
                    format!("no {} with id {}", kind.as_str(), id),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl MediaDevices for SyntheticDevices {
    type Stream = NativeStream;

    async fn get_user_media(&self, request: &CaptureRequest) -> Result<NativeStream, PlatformError> {
        if let CaptureRequest::Exact(constraints) = request {
            self.check_device(DeviceKind::AudioInput, constraints.audio_device_id())?;
            self.check_device(DeviceKind::VideoInput, constraints.video_device_id())?;
        }

        let n = self.issued.get();
        self.issued.set(n + 1);

        let stream_id = format!("synthetic-{n}");
        let tracks = vec![
            NativeTrack::new(MediaKind::Audio, format!("{stream_id}-audio"), &stream_id),
            NativeTrack::new(MediaKind::Video, format!("{stream_id}-video"), &stream_id),
        ];
        debug!("Issued synthetic stream {}", stream_id);
        Ok(NativeStream::new(stream_id, tracks))
    }

    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError> {
        Ok(self.devices.clone())
    }
}
