//! Seams between the negotiation core and the host platform.
//!
//! The browser binding implements these over `navigator.mediaDevices` and
//! `RTCPeerConnection`; the native binding implements them over webrtc-rs.
//! Everything runs on one thread, so none of the futures are `Send`.

mod peer_event;

pub use peer_event::{PeerEvent, PeerEventSink, TaggedPeerEvent};

use async_trait::async_trait;
use livecast_core::{
    DeviceDescriptor, IceCandidate, MediaConstraints, MediaKind, PlatformError,
    SessionDescription,
};
use serde_json::Value;

pub trait MediaTrack: Clone + 'static {
    fn id(&self) -> String;
    fn kind(&self) -> MediaKind;
    /// Stops capture on this track. Only the device manager calls this for local tracks.
    fn stop(&self);
}

pub trait MediaStream: Clone + 'static {
    type Track: MediaTrack;

    fn id(&self) -> String;
    fn tracks(&self) -> Vec<Self::Track>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureRequest {
    /// Any audio and any video device; used to obtain permission before enumeration.
    Any,
    /// Devices and settings from a constraint snapshot.
    Exact(MediaConstraints),
}

#[async_trait(?Send)]
pub trait MediaDevices: 'static {
    type Stream: MediaStream;

    async fn get_user_media(&self, request: &CaptureRequest) -> Result<Self::Stream, PlatformError>;

    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError>;
}

#[async_trait(?Send)]
pub trait PeerConnection: 'static {
    type LocalTrack: MediaTrack;
    type RemoteTrack: 'static;

    async fn add_send_only_track(&self, track: &Self::LocalTrack) -> Result<(), PlatformError>;

    async fn add_recv_only_transceiver(&self, kind: MediaKind) -> Result<(), PlatformError>;

    async fn create_offer(&self) -> Result<SessionDescription, PlatformError>;

    async fn create_answer(&self) -> Result<SessionDescription, PlatformError>;

    async fn set_local_description(&self, desc: &SessionDescription) -> Result<(), PlatformError>;

    async fn set_remote_description(&self, desc: &SessionDescription)
    -> Result<(), PlatformError>;

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), PlatformError>;

    async fn close(&self);
}

#[async_trait(?Send)]
pub trait PeerFactory: 'static {
    type Connection: PeerConnection;

    /// Allocates a fresh connection whose platform callbacks report into `sink`.
    async fn create(
        &self,
        sink: PeerEventSink<<Self::Connection as PeerConnection>::RemoteTrack>,
    ) -> Result<Self::Connection, PlatformError>;
}

/// Outbound half of the externally supplied event channel.
pub trait SignalingAdapter: 'static {
    fn send(&self, event: &str, payload: Value);
}

pub type StreamOf<D> = <D as MediaDevices>::Stream;
pub type TrackOf<D> = <StreamOf<D> as MediaStream>::Track;
pub type ConnectionOf<F> = <F as PeerFactory>::Connection;
pub type RemoteTrackOf<F> = <ConnectionOf<F> as PeerConnection>::RemoteTrack;
