use livecast_core::IceServerConfig;
use livecast_core::utils::DEFAULT_STUN_ADDRS;
use wasm_bindgen::JsValue;

pub(super) fn rtc_configuration(servers: Option<&[IceServerConfig]>) -> web_sys::RtcConfiguration {
    let rtc_config = web_sys::RtcConfiguration::new();
    let ice_servers_arr = js_sys::Array::new();

    match servers {
        Some(servers) => {
            for server_config in servers {
                let rtc_ice_server = web_sys::RtcIceServer::new();

                let urls = js_sys::Array::new();
                for url in &server_config.urls {
                    urls.push(&JsValue::from_str(url));
                }
                rtc_ice_server.set_urls(&urls);

                if let Some(username) = &server_config.username {
                    rtc_ice_server.set_username(username);
                }
                if let Some(credential) = &server_config.credential {
                    rtc_ice_server.set_credential(credential);
                }

                ice_servers_arr.push(&rtc_ice_server);
            }
        }
        None => {
            let stun_urls = js_sys::Array::new();
            for url in DEFAULT_STUN_ADDRS {
                stun_urls.push(&JsValue::from_str(url));
            }

            let stun_server = web_sys::RtcIceServer::new();
            stun_server.set_urls(&stun_urls);
            ice_servers_arr.push(&stun_server);
        }
    }

    rtc_config.set_ice_servers(&ice_servers_arr);
    rtc_config
}
