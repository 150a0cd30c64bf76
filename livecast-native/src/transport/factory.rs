use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use livecast_core::{IceCandidate, PeerConnectionState, PlatformError};
use livecast_engine::{PeerEventSink, PeerFactory};
use tracing::{info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

use super::TransportConfig;
use super::connection::{NativePeerConnection, NativeRemoteTrack};
use crate::error::platform_error;

/// Builds webrtc-rs connections that report into the engine's event sink.
#[derive(Clone)]
pub struct NativePeerFactory {
    api: Arc<API>,
    config: TransportConfig,
}

impl NativePeerFactory {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self {
            api: Arc::new(api),
            config,
        })
    }
}

#[async_trait(?Send)]
impl PeerFactory for NativePeerFactory {
    type Connection = NativePeerConnection;

    async fn create(
        &self,
        sink: PeerEventSink<NativeRemoteTrack>,
    ) -> Result<NativePeerConnection, PlatformError> {
        let rtc_config = RTCConfiguration {
            ice_servers: self.config.rtc_ice_servers(),
            ..Default::default()
        };
        let peer_connection = Arc::new(
            self.api
                .new_peer_connection(rtc_config)
                .await
                .map_err(platform_error)?,
        );

        let state_sink = sink.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let sink = state_sink.clone();
                Box::pin(async move {
                    info!("{} connection state changed: {}", sink.role(), s);
                    if let Some(state) = map_state(s) {
                        sink.connection_state(state);
                    }
                })
            },
        ));

        let ice_sink = sink.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_sink.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => sink.local_candidate(candidate_from_init(init)),
                    Err(e) => warn!(
                        "{} dropped local candidate {}: {}",
                        sink.role(),
                        candidate.address,
                        e
                    ),
                }
            })
        }));

        let track_sink = sink;
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let sink = track_sink.clone();
            Box::pin(async move {
                info!("Received remote {} track {}", track.kind(), track.id());
                sink.remote_track(NativeRemoteTrack::new(track));
            })
        }));

        Ok(NativePeerConnection::new(peer_connection))
    }
}

fn map_state(state: RTCPeerConnectionState) -> Option<PeerConnectionState> {
    match state {
        RTCPeerConnectionState::New => Some(PeerConnectionState::New),
        RTCPeerConnectionState::Connecting => Some(PeerConnectionState::Connecting),
        RTCPeerConnectionState::Connected => Some(PeerConnectionState::Connected),
        RTCPeerConnectionState::Disconnected => Some(PeerConnectionState::Disconnected),
        RTCPeerConnectionState::Failed => Some(PeerConnectionState::Failed),
        RTCPeerConnectionState::Closed => Some(PeerConnectionState::Closed),
        RTCPeerConnectionState::Unspecified => None,
    }
}

fn candidate_from_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
