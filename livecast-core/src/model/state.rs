use serde::{Deserialize, Serialize};

/// Negotiation state of one peer controller.
///
/// Source path: `New -> LocalOfferCreated -> AwaitingRemoteAnswer -> Negotiated -> Connected`.
/// Sink path: `New -> RemoteOfferReceived -> LocalAnswerCreated -> Negotiated -> Connected`.
/// Either may end in `Failed` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    New,
    LocalOfferCreated,
    AwaitingRemoteAnswer,
    RemoteOfferReceived,
    LocalAnswerCreated,
    Negotiated,
    Connected,
    Failed,
    Closed,
}

impl ControllerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ControllerState::Failed | ControllerState::Closed)
    }
}

/// Platform-level connection state as reported by the underlying peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}
