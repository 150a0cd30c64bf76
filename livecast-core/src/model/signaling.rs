use serde::{Deserialize, Serialize};

use crate::model::role::{ConnectionRole, StreamingMode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
}

/// SDP payload. The `sdp` body is carried verbatim and never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Trickled ICE candidate in the shape browsers produce from `RTCIceCandidate.toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
            username_fragment: None,
        }
    }
}

/// `{ type, data }` envelope exchanged on a signaling channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SignalEvent {
    SdpOffer(SessionDescription),
    SdpAnswer(SessionDescription),
    IceCandidate(IceCandidate),
}

impl SignalEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            SignalEvent::SdpOffer(_) => "sdp_offer",
            SignalEvent::SdpAnswer(_) => "sdp_answer",
            SignalEvent::IceCandidate(_) => "ice_candidate",
        }
    }
}

/// Named signaling channel on the external event boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `webrtc_event`, the only channel in publisher mode.
    Webrtc,
    /// `source_webrtc_event`
    SourceWebrtc,
    /// `sink_webrtc_event`
    SinkWebrtc,
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Webrtc => "webrtc_event",
            Channel::SourceWebrtc => "source_webrtc_event",
            Channel::SinkWebrtc => "sink_webrtc_event",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "webrtc_event" => Some(Channel::Webrtc),
            "source_webrtc_event" => Some(Channel::SourceWebrtc),
            "sink_webrtc_event" => Some(Channel::SinkWebrtc),
            _ => None,
        }
    }

    /// Channel a controller of `role` is addressed by in `mode`.
    pub fn for_role(mode: StreamingMode, role: ConnectionRole) -> Option<Self> {
        match (mode, role) {
            (StreamingMode::Publisher, ConnectionRole::Source) => Some(Channel::Webrtc),
            (StreamingMode::Publisher, ConnectionRole::Sink) => None,
            (StreamingMode::Echo, ConnectionRole::Source) => Some(Channel::SourceWebrtc),
            (StreamingMode::Echo, ConnectionRole::Sink) => Some(Channel::SinkWebrtc),
        }
    }

    /// Inverse of [`Channel::for_role`]: `None` when the channel does not exist in `mode`.
    pub fn role_in(&self, mode: StreamingMode) -> Option<ConnectionRole> {
        match (mode, self) {
            (StreamingMode::Publisher, Channel::Webrtc) => Some(ConnectionRole::Source),
            (StreamingMode::Echo, Channel::SourceWebrtc) => Some(ConnectionRole::Source),
            (StreamingMode::Echo, Channel::SinkWebrtc) => Some(ConnectionRole::Sink),
            _ => None,
        }
    }
}

/// Start/stop commands consumed from the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Start,
    Stop,
}

impl ControlSignal {
    pub fn parse(mode: StreamingMode, name: &str) -> Option<Self> {
        match (mode, name) {
            (_, "start_streaming") => Some(ControlSignal::Start),
            (_, "stop_streaming") => Some(ControlSignal::Stop),
            (StreamingMode::Publisher, "start_stream") => Some(ControlSignal::Start),
            (StreamingMode::Publisher, "stop_stream") => Some(ControlSignal::Stop),
            _ => None,
        }
    }
}
