use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    AudioInput,
    VideoInput,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::AudioInput => "audioinput",
            DeviceKind::VideoInput => "videoinput",
        }
    }

    /// Maps an enumeration kind string. Output devices have no capture role and map to `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "audioinput" => Some(DeviceKind::AudioInput),
            "videoinput" => Some(DeviceKind::VideoInput),
            _ => None,
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        match self {
            DeviceKind::AudioInput => MediaKind::Audio,
            DeviceKind::VideoInput => MediaKind::Video,
        }
    }
}

/// One capture device as reported by a fresh enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    pub device_id: String,
    /// May be empty: some browsers drop labels once the owning stream is released.
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(kind: DeviceKind, device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            device_id: device_id.into(),
            label: label.into(),
        }
    }

    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("{} ({})", self.kind.as_str(), self.device_id)
        } else {
            self.label.clone()
        }
    }
}

/// Result of one probe. Order is whatever the platform reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceList {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self { devices }
    }

    pub fn all(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn audio(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.of_kind(DeviceKind::AudioInput)
    }

    pub fn video(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.of_kind(DeviceKind::VideoInput)
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    fn of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.iter().filter(move |d| d.kind == kind)
    }
}
