mod callbacks;
mod config;

use std::cell::RefCell;

use async_trait::async_trait;
use livecast_core::{
    IceCandidate, IceServerConfig, MediaKind, PlatformError, SdpType, SessionDescription,
};
use livecast_engine::{PeerConnection, PeerEventSink, PeerFactory};
use tracing::{info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{RtcRtpTransceiverDirection, RtcRtpTransceiverInit, RtcSdpType};

use crate::error::platform_error;
use crate::media::WebTrack;
use callbacks::Callbacks;

/// Creates `RTCPeerConnection`s with the session's ICE server set.
#[derive(Clone, Default)]
pub struct WebPeerFactory {
    ice_servers: Option<Vec<IceServerConfig>>,
}

impl WebPeerFactory {
    /// `None` uses the public STUN servers.
    pub fn new(ice_servers: Option<Vec<IceServerConfig>>) -> Self {
        Self { ice_servers }
    }
}

#[async_trait(?Send)]
impl PeerFactory for WebPeerFactory {
    type Connection = WebPeerConnection;

    async fn create(
        &self,
        sink: PeerEventSink<WebTrack>,
    ) -> Result<WebPeerConnection, PlatformError> {
        let rtc_config = config::rtc_configuration(self.ice_servers.as_deref());
        let pc = web_sys::RtcPeerConnection::new_with_configuration(&rtc_config)
            .map_err(platform_error)?;
        let callbacks = Callbacks::attach(&pc, sink);

        Ok(WebPeerConnection {
            pc,
            callbacks: RefCell::new(Some(callbacks)),
        })
    }
}

pub struct WebPeerConnection {
    pc: web_sys::RtcPeerConnection,
    callbacks: RefCell<Option<Callbacks>>,
}

impl WebPeerConnection {
    fn transceiver_init(direction: RtcRtpTransceiverDirection) -> RtcRtpTransceiverInit {
        let init = RtcRtpTransceiverInit::new();
        init.set_direction(direction);
        init
    }
}

#[async_trait(?Send)]
impl PeerConnection for WebPeerConnection {
    type LocalTrack = WebTrack;
    type RemoteTrack = WebTrack;

    async fn add_send_only_track(&self, track: &WebTrack) -> Result<(), PlatformError> {
        let init = Self::transceiver_init(RtcRtpTransceiverDirection::Sendonly);
        self.pc
            .add_transceiver_with_media_stream_track_and_init(track.inner(), &init);
        Ok(())
    }

    async fn add_recv_only_transceiver(&self, kind: MediaKind) -> Result<(), PlatformError> {
        let init = Self::transceiver_init(RtcRtpTransceiverDirection::Recvonly);
        self.pc.add_transceiver_with_str_and_init(kind.as_str(), &init);
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, PlatformError> {
        let offer = JsFuture::from(self.pc.create_offer())
            .await
            .map_err(platform_error)?;
        Ok(SessionDescription::offer(read_sdp(&offer)?))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PlatformError> {
        let answer = JsFuture::from(self.pc.create_answer())
            .await
            .map_err(platform_error)?;
        Ok(SessionDescription::answer(read_sdp(&answer)?))
    }

    async fn set_local_description(&self, desc: &SessionDescription) -> Result<(), PlatformError> {
        JsFuture::from(self.pc.set_local_description(&description_init(desc)))
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: &SessionDescription,
    ) -> Result<(), PlatformError> {
        JsFuture::from(self.pc.set_remote_description(&description_init(desc)))
            .await
            .map_err(platform_error)?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), PlatformError> {
        let init = web_sys::RtcIceCandidateInit::new(&candidate.candidate);
        init.set_sdp_mid(candidate.sdp_mid.as_deref());
        init.set_sdp_m_line_index(candidate.sdp_m_line_index);
        if let Some(ufrag) = &candidate.username_fragment {
            if let Err(e) =
                js_sys::Reflect::set(&init, &"usernameFragment".into(), &JsValue::from_str(ufrag))
            {
                warn!("Failed to set usernameFragment on candidate: {:?}", e);
            }
        }

        JsFuture::from(
            self.pc
                .add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init)),
        )
        .await
        .map_err(platform_error)?;
        Ok(())
    }

    async fn close(&self) {
        if let Some(callbacks) = self.callbacks.borrow_mut().take() {
            callbacks.detach(&self.pc);
        }
        self.pc.close();
        info!("RTCPeerConnection closed");
    }
}

fn read_sdp(desc: &JsValue) -> Result<String, PlatformError> {
    js_sys::Reflect::get(desc, &"sdp".into())
        .ok()
        .and_then(|sdp| sdp.as_string())
        .ok_or_else(|| PlatformError::new("session description has no sdp"))
}

fn description_init(desc: &SessionDescription) -> web_sys::RtcSessionDescriptionInit {
    let kind = match desc.kind {
        SdpType::Offer => RtcSdpType::Offer,
        SdpType::Answer => RtcSdpType::Answer,
    };
    let init = web_sys::RtcSessionDescriptionInit::new(kind);
    init.set_sdp(&desc.sdp);
    init
}
