use thiserror::Error;

use crate::model::{ConnectionRole, ControllerState};

/// Failure reported by a platform binding (browser promise rejection, webrtc-rs error).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct PlatformError {
    /// DOM exception name when the platform provides one, e.g. `NotAllowedError`.
    pub name: Option<String>,
    pub message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("capture permission denied: {0}")]
    PermissionDenied(String),

    #[error("no capture device found: {0}")]
    NoDeviceFound(String),

    #[error("no device satisfies the requested constraints: {0}")]
    ConstraintUnsatisfiable(String),

    #[error("media platform error: {0}")]
    Platform(PlatformError),
}

impl From<PlatformError> for DeviceError {
    fn from(err: PlatformError) -> Self {
        match err.name.as_deref() {
            Some("NotAllowedError") | Some("SecurityError") => {
                DeviceError::PermissionDenied(err.message)
            }
            Some("NotFoundError") => DeviceError::NoDeviceFound(err.message),
            Some("OverconstrainedError") => DeviceError::ConstraintUnsatisfiable(err.message),
            _ => DeviceError::Platform(err),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("{role} negotiation failed: {message}")]
    Negotiation {
        role: ConnectionRole,
        message: String,
    },

    #[error("{role} controller cannot {operation} while {state:?}")]
    UnexpectedMessage {
        role: ConnectionRole,
        state: ControllerState,
        operation: &'static str,
    },

    #[error("{role} controller is closed")]
    ClosedConnection { role: ConnectionRole },

    #[error("{role} rejected remote candidate: {message}")]
    CandidateRejected {
        role: ConnectionRole,
        message: String,
    },
}

impl ControllerError {
    pub fn role(&self) -> ConnectionRole {
        match self {
            ControllerError::Negotiation { role, .. }
            | ControllerError::UnexpectedMessage { role, .. }
            | ControllerError::ClosedConnection { role }
            | ControllerError::CandidateRejected { role, .. } => *role,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a streaming session is already active")]
    AlreadyStreaming,

    #[error("no captured stream; acquire devices before starting")]
    NoStream,

    #[error("streaming attempt was stopped before negotiation finished")]
    Cancelled,

    #[error("streaming session failed: {0}")]
    SessionFailed(String),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}
