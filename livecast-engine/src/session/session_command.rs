use livecast_core::{MediaConstraints, StreamingMode};
use serde_json::Value;

/// Requests queued to the session loop.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Enumerate devices without keeping a capture.
    Probe,
    /// Probe, then capture with the first audio and video device.
    BringUp,
    ApplyConstraints(MediaConstraints),
    Start(StreamingMode),
    Stop,
    /// Inbound `{type, data}` message on a named channel.
    Signal { channel: String, message: Value },
    /// Tear everything down and leave the loop.
    Shutdown,
}
