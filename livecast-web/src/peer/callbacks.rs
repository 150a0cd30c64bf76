use livecast_core::{IceCandidate, PeerConnectionState};
use livecast_engine::PeerEventSink;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::RtcPeerConnectionState;

use crate::media::WebTrack;

/// JS handlers installed on one connection. Dropping them invalidates the handlers,
/// so they are unset on the connection first.
pub(super) struct Callbacks {
    _on_ice: Closure<dyn FnMut(web_sys::RtcPeerConnectionIceEvent)>,
    _on_track: Closure<dyn FnMut(web_sys::RtcTrackEvent)>,
    _on_state: Closure<dyn FnMut(web_sys::Event)>,
}

impl Callbacks {
    pub(super) fn attach(pc: &web_sys::RtcPeerConnection, sink: PeerEventSink<WebTrack>) -> Self {
        let ice_sink = sink.clone();
        let on_ice = Closure::wrap(Box::new(move |ev: web_sys::RtcPeerConnectionIceEvent| {
            // A null candidate marks the end of gathering.
            let Some(candidate) = ev.candidate() else {
                return;
            };
            if candidate.candidate().is_empty() {
                return;
            }
            ice_sink.local_candidate(IceCandidate {
                candidate: candidate.candidate(),
                sdp_mid: candidate.sdp_mid(),
                sdp_m_line_index: candidate.sdp_m_line_index(),
                username_fragment: js_sys::Reflect::get(&candidate, &"usernameFragment".into())
                    .ok()
                    .and_then(|v| v.as_string()),
            });
        })
            as Box<dyn FnMut(web_sys::RtcPeerConnectionIceEvent)>);
        pc.set_onicecandidate(Some(on_ice.as_ref().unchecked_ref()));

        let track_sink = sink.clone();
        let on_track = Closure::wrap(Box::new(move |ev: web_sys::RtcTrackEvent| {
            track_sink.remote_track(WebTrack::new(ev.track()));
        }) as Box<dyn FnMut(web_sys::RtcTrackEvent)>);
        pc.set_ontrack(Some(on_track.as_ref().unchecked_ref()));

        let state_pc = pc.clone();
        let on_state = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            if let Some(state) = map_state(state_pc.connection_state()) {
                sink.connection_state(state);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        pc.set_onconnectionstatechange(Some(on_state.as_ref().unchecked_ref()));

        Self {
            _on_ice: on_ice,
            _on_track: on_track,
            _on_state: on_state,
        }
    }

    pub(super) fn detach(self, pc: &web_sys::RtcPeerConnection) {
        pc.set_onicecandidate(None);
        pc.set_ontrack(None);
        pc.set_onconnectionstatechange(None);
    }
}

fn map_state(state: RtcPeerConnectionState) -> Option<PeerConnectionState> {
    match state {
        RtcPeerConnectionState::New => Some(PeerConnectionState::New),
        RtcPeerConnectionState::Connecting => Some(PeerConnectionState::Connecting),
        RtcPeerConnectionState::Connected => Some(PeerConnectionState::Connected),
        RtcPeerConnectionState::Disconnected => Some(PeerConnectionState::Disconnected),
        RtcPeerConnectionState::Failed => Some(PeerConnectionState::Failed),
        RtcPeerConnectionState::Closed => Some(PeerConnectionState::Closed),
        _ => None,
    }
}
