use livecast_core::IceServerConfig;
use livecast_core::utils::DEFAULT_STUN_ADDR;
use webrtc::ice_transport::ice_server::RTCIceServer;

/// ICE settings for native peer connections.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl TransportConfig {
    /// Host candidates only; used where no STUN server is reachable.
    pub fn host_only() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }

    /// `None` keeps the default STUN server.
    pub fn from_ice_servers(servers: Option<Vec<IceServerConfig>>) -> Self {
        match servers {
            Some(ice_servers) => Self { ice_servers },
            None => Self::default(),
        }
    }

    pub(crate) fn rtc_ice_servers(&self) -> Vec<RTCIceServer> {
        self.ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect()
    }
}
