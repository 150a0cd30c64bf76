use serde::{Deserialize, Serialize};
use std::fmt;

/// Send-only vs receive-only responsibility of a peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRole {
    /// Uploads locally captured tracks.
    Source,
    /// Receives the returned stream on recv-only transceivers.
    Sink,
}

impl ConnectionRole {
    pub const ALL: [ConnectionRole; 2] = [ConnectionRole::Source, ConnectionRole::Sink];
}

impl fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRole::Source => write!(f, "source"),
            ConnectionRole::Sink => write!(f, "sink"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamingMode {
    /// Source and sink legs: media goes up and comes back.
    #[default]
    Echo,
    /// A single source leg.
    Publisher,
}

impl StreamingMode {
    /// Roles a session in this mode allocates controllers for.
    pub fn roles(&self) -> &'static [ConnectionRole] {
        match self {
            StreamingMode::Echo => &ConnectionRole::ALL,
            StreamingMode::Publisher => &[ConnectionRole::Source],
        }
    }
}

impl fmt::Display for StreamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamingMode::Echo => write!(f, "echo"),
            StreamingMode::Publisher => write!(f, "publisher"),
        }
    }
}
