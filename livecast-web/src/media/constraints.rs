use livecast_core::MediaConstraints;
use livecast_engine::CaptureRequest;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Exact<'a> {
    exact: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<Exact<'a>>,
    width: u32,
    height: u32,
    frame_rate: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<Exact<'a>>,
    echo_cancellation: bool,
    auto_gain_control: bool,
    noise_suppression: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TrackRequest<T> {
    Any(bool),
    Exact(T),
}

/// `getUserMedia` argument for a capture request.
#[derive(Debug, Serialize)]
pub(crate) struct CaptureConstraints<'a> {
    audio: TrackRequest<AudioRequest<'a>>,
    video: TrackRequest<VideoRequest<'a>>,
}

impl<'a> CaptureConstraints<'a> {
    pub(crate) fn from_request(request: &'a CaptureRequest) -> Self {
        match request {
            CaptureRequest::Any => Self {
                audio: TrackRequest::Any(true),
                video: TrackRequest::Any(true),
            },
            CaptureRequest::Exact(c) => Self::exact(c),
        }
    }

    fn exact(c: &'a MediaConstraints) -> Self {
        Self {
            audio: TrackRequest::Exact(AudioRequest {
                device_id: c.audio_device_id().map(|exact| Exact { exact }),
                echo_cancellation: c.echo_cancellation(),
                auto_gain_control: c.auto_gain_control(),
                noise_suppression: c.noise_suppression(),
            }),
            video: TrackRequest::Exact(VideoRequest {
                device_id: c.video_device_id().map(|exact| Exact { exact }),
                width: c.width(),
                height: c.height(),
                frame_rate: c.frame_rate(),
            }),
        }
    }
}
