use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use livecast_core::MediaKind;
use livecast_engine::{MediaStream, MediaTrack};
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Local sample-fed track. Stopping it only marks it stopped; webrtc-rs has no capture to end.
#[derive(Clone)]
pub struct NativeTrack {
    kind: MediaKind,
    sample: Arc<TrackLocalStaticSample>,
    stopped: Arc<AtomicBool>,
}

impl NativeTrack {
    pub fn new(kind: MediaKind, id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        let capability = match kind {
            MediaKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            MediaKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        };

        Self {
            kind,
            sample: Arc::new(TrackLocalStaticSample::new(
                capability,
                id.into(),
                stream_id.into(),
            )),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared handle for attaching to a peer connection.
    pub fn local(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        self.sample.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Pushes one encoded frame to every connection the track is bound to.
    pub async fn write_sample(&self, data: Bytes, duration: Duration) -> Result<()> {
        if self.is_stopped() {
            bail!("track {} is stopped", self.sample.id());
        }
        self.sample
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await
            .context("Failed to write sample")
    }
}

impl std::fmt::Debug for NativeTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeTrack")
            .field("id", &self.sample.id())
            .field("kind", &self.kind)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl MediaTrack for NativeTrack {
    fn id(&self) -> String {
        self.sample.id().to_owned()
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct NativeStream {
    id: String,
    tracks: Vec<NativeTrack>,
}

impl NativeStream {
    pub fn new(id: impl Into<String>, tracks: Vec<NativeTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| !t.is_stopped())
    }
}

impl MediaStream for NativeStream {
    type Track = NativeTrack;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn tracks(&self) -> Vec<NativeTrack> {
        self.tracks.clone()
    }
}
