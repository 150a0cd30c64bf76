use livecast_core::{ConnectionRole, ControllerState, DeviceList, StreamingMode};

/// Reports from a session to the host UI.
#[derive(Debug)]
pub enum SessionEvent<S, R> {
    /// Fresh enumeration result; replaces any earlier list.
    DevicesChanged(DeviceList),
    /// Newly acquired local capture, for preview.
    PreviewReady(S),
    StreamingStarted(StreamingMode),
    /// Every leg of the attempt reached `Connected`.
    Established,
    StreamingStopped,
    ControllerState {
        role: ConnectionRole,
        state: ControllerState,
    },
    /// Remote track from the sink leg, delivered once per track.
    RemoteTrack(R),
    /// The attempt was torn down. Emitted once per attempt.
    SessionFailed(String),
    Warning(String),
    Error(String),
}
