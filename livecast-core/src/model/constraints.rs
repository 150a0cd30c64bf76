use serde::{Deserialize, Serialize};

use crate::utils::{DEFAULT_FRAME_RATE, DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Capture settings snapshot.
///
/// A value is never changed after construction: every `with_*` call consumes the
/// snapshot and returns a new one, so a stream acquired from one snapshot can
/// always be compared against the settings that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaConstraints {
    video_device_id: Option<String>,
    audio_device_id: Option<String>,
    width: u32,
    height: u32,
    frame_rate: u32,
    echo_cancellation: bool,
    auto_gain_control: bool,
    noise_suppression: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video_device_id: None,
            audio_device_id: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: DEFAULT_FRAME_RATE,
            echo_cancellation: true,
            auto_gain_control: true,
            noise_suppression: true,
        }
    }
}

impl MediaConstraints {
    pub fn video_device_id(&self) -> Option<&str> {
        self.video_device_id.as_deref()
    }

    pub fn audio_device_id(&self) -> Option<&str> {
        self.audio_device_id.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn echo_cancellation(&self) -> bool {
        self.echo_cancellation
    }

    pub fn auto_gain_control(&self) -> bool {
        self.auto_gain_control
    }

    pub fn noise_suppression(&self) -> bool {
        self.noise_suppression
    }

    pub fn with_video_device(self, device_id: impl Into<String>) -> Self {
        Self {
            video_device_id: Some(device_id.into()),
            ..self
        }
    }

    pub fn with_audio_device(self, device_id: impl Into<String>) -> Self {
        Self {
            audio_device_id: Some(device_id.into()),
            ..self
        }
    }

    pub fn with_resolution(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn with_frame_rate(self, frame_rate: u32) -> Self {
        Self { frame_rate, ..self }
    }

    pub fn with_audio_processing(
        self,
        echo_cancellation: bool,
        auto_gain_control: bool,
        noise_suppression: bool,
    ) -> Self {
        Self {
            echo_cancellation,
            auto_gain_control,
            noise_suppression,
            ..self
        }
    }

    /// True when both device slots are pinned to a concrete device.
    pub fn has_devices(&self) -> bool {
        self.video_device_id.is_some() && self.audio_device_id.is_some()
    }
}
