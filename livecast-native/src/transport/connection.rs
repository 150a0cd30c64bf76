use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use livecast_core::{
    IceCandidate, MediaKind, PlatformError, SdpType, SessionDescription,
};
use livecast_engine::PeerConnection;
use tracing::{debug, warn};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::track::track_remote::TrackRemote;

use crate::error::platform_error;
use crate::media::NativeTrack;

/// Track received on a sink connection.
#[derive(Clone)]
pub struct NativeRemoteTrack(Arc<TrackRemote>);

impl NativeRemoteTrack {
    pub(crate) fn new(track: Arc<TrackRemote>) -> Self {
        Self(track)
    }

    pub fn id(&self) -> String {
        self.0.id()
    }

    pub fn kind(&self) -> Option<MediaKind> {
        match self.0.kind() {
            RTPCodecType::Audio => Some(MediaKind::Audio),
            RTPCodecType::Video => Some(MediaKind::Video),
            RTPCodecType::Unspecified => None,
        }
    }

    /// The webrtc-rs track, for reading RTP.
    pub fn inner(&self) -> &Arc<TrackRemote> {
        &self.0
    }
}

impl std::fmt::Debug for NativeRemoteTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NativeRemoteTrack").field(&self.id()).finish()
    }
}

pub struct NativePeerConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

impl NativePeerConnection {
    pub(crate) fn new(peer_connection: Arc<RTCPeerConnection>) -> Self {
        Self { peer_connection }
    }

    pub fn inner(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }

    async fn add_transceiver(&self, track: &NativeTrack) -> Result<()> {
        self.peer_connection
            .add_transceiver_from_track(
                track.local(),
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Sendonly,
                    send_encodings: vec![],
                }),
            )
            .await
            .context("Failed to add send-only transceiver")?;
        Ok(())
    }

    async fn add_receiver(&self, kind: MediaKind) -> Result<()> {
        let codec_type = match kind {
            MediaKind::Audio => RTPCodecType::Audio,
            MediaKind::Video => RTPCodecType::Video,
        };
        self.peer_connection
            .add_transceiver_from_kind(
                codec_type,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Recvonly,
                    send_encodings: vec![],
                }),
            )
            .await
            .context("Failed to add recv-only transceiver")?;
        Ok(())
    }

    async fn apply(&self, desc: &SessionDescription, local: bool) -> Result<()> {
        let rtc = match desc.kind {
            SdpType::Offer => RTCSessionDescription::offer(desc.sdp.clone())?,
            SdpType::Answer => RTCSessionDescription::answer(desc.sdp.clone())?,
        };
        if local {
            self.peer_connection.set_local_description(rtc).await?;
        } else {
            self.peer_connection.set_remote_description(rtc).await?;
        }
        Ok(())
    }

    async fn add_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment.clone(),
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")
    }
}

#[async_trait(?Send)]
impl PeerConnection for NativePeerConnection {
    type LocalTrack = NativeTrack;
    type RemoteTrack = NativeRemoteTrack;

    async fn add_send_only_track(&self, track: &NativeTrack) -> Result<(), PlatformError> {
        self.add_transceiver(track).await.map_err(platform_error)
    }

    async fn add_recv_only_transceiver(&self, kind: MediaKind) -> Result<(), PlatformError> {
        self.add_receiver(kind).await.map_err(platform_error)
    }

    async fn create_offer(&self) -> Result<SessionDescription, PlatformError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(platform_error)?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PlatformError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(platform_error)?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: &SessionDescription) -> Result<(), PlatformError> {
        self.apply(desc, true).await.map_err(platform_error)
    }

    async fn set_remote_description(
        &self,
        desc: &SessionDescription,
    ) -> Result<(), PlatformError> {
        self.apply(desc, false).await.map_err(platform_error)
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), PlatformError> {
        self.add_candidate(candidate).await.map_err(platform_error)
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            warn!("Error closing peer connection: {}", e);
        } else {
            debug!("Peer connection closed");
        }
    }
}
