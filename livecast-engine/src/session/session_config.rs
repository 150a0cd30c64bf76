use livecast_core::{IceServerConfig, MediaConstraints, StreamingMode};
use serde::{Deserialize, Serialize};

/// Host-supplied session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub mode: StreamingMode,
    /// `None` falls back to the public STUN set.
    pub ice_servers: Option<Vec<IceServerConfig>>,
    pub constraints: MediaConstraints,
}

impl SessionConfig {
    pub fn new(mode: StreamingMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}
