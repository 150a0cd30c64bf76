use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use livecast_engine::{
    CaptureRequest, DeviceDescriptor, DeviceKind, MediaDevices, MediaKind, MediaStream,
    MediaTrack, PlatformError,
};

#[derive(Debug, Clone)]
pub struct MockTrack {
    id: String,
    kind: MediaKind,
    stops: Rc<Cell<u32>>,
}

impl MockTrack {
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            kind,
            stops: Rc::new(Cell::new(0)),
        }
    }

    pub fn stop_count(&self) -> u32 {
        self.stops.get()
    }

    pub fn is_live(&self) -> bool {
        self.stops.get() == 0
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn stop(&self) {
        self.stops.set(self.stops.get() + 1);
    }
}

#[derive(Debug, Clone)]
pub struct MockStream {
    id: String,
    tracks: Vec<MockTrack>,
}

impl MockStream {
    pub fn is_live(&self) -> bool {
        self.tracks.iter().all(MockTrack::is_live)
    }
}

impl MediaStream for MockStream {
    type Track = MockTrack;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn tracks(&self) -> Vec<MockTrack> {
        self.tracks.clone()
    }
}

/// Scripted behaviour and a record of what the device layer was asked to do.
#[derive(Default)]
pub struct DeviceScript {
    pub devices: Vec<DeviceDescriptor>,
    pub audio_tracks: usize,
    pub video_tracks: usize,
    /// Error returned by every capture request.
    pub fail_capture: Option<PlatformError>,
    /// Error returned by exact-device capture only.
    pub fail_exact: Option<PlatformError>,
    /// Report empty labels unless a stream is live, as Firefox does.
    pub hide_labels_when_idle: bool,
    pub requests: Vec<CaptureRequest>,
    pub issued: Vec<MockStream>,
}

#[derive(Clone)]
pub struct MockDevices {
    script: Rc<RefCell<DeviceScript>>,
}

impl Default for MockDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevices {
    /// One microphone and one camera, one track of each kind per stream.
    pub fn new() -> Self {
        Self::with_devices(vec![
            DeviceDescriptor::new(DeviceKind::AudioInput, "mic-1", "Internal Microphone"),
            DeviceDescriptor::new(DeviceKind::VideoInput, "cam-1", "FaceTime HD Camera"),
        ])
    }

    pub fn with_devices(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            script: Rc::new(RefCell::new(DeviceScript {
                devices,
                audio_tracks: 1,
                video_tracks: 1,
                ..Default::default()
            })),
        }
    }

    pub fn script(&self) -> std::cell::RefMut<'_, DeviceScript> {
        self.script.borrow_mut()
    }

    pub fn issued(&self) -> Vec<MockStream> {
        self.script.borrow().issued.clone()
    }

    pub fn requests(&self) -> Vec<CaptureRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn live_streams(&self) -> usize {
        self.script.borrow().issued.iter().filter(|s| s.is_live()).count()
    }
}

#[async_trait(?Send)]
impl MediaDevices for MockDevices {
    type Stream = MockStream;

    async fn get_user_media(&self, request: &CaptureRequest) -> Result<MockStream, PlatformError> {
        let mut script = self.script.borrow_mut();
        script.requests.push(request.clone());

        if let Some(err) = script.fail_capture.clone() {
            return Err(err);
        }
        if let (CaptureRequest::Exact(_), Some(err)) = (request, script.fail_exact.clone()) {
            return Err(err);
        }

        let n = script.issued.len();
        let mut tracks = Vec::new();
        for i in 0..script.audio_tracks {
            tracks.push(MockTrack::new(format!("s{n}-audio-{i}"), MediaKind::Audio));
        }
        for i in 0..script.video_tracks {
            tracks.push(MockTrack::new(format!("s{n}-video-{i}"), MediaKind::Video));
        }

        let stream = MockStream {
            id: format!("stream-{n}"),
            tracks,
        };
        script.issued.push(stream.clone());
        Ok(stream)
    }

    async fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, PlatformError> {
        let script = self.script.borrow();
        let live = script.issued.iter().any(MockStream::is_live);

        Ok(script
            .devices
            .iter()
            .cloned()
            .map(|mut d| {
                if script.hide_labels_when_idle && !live {
                    d.label.clear();
                }
                d
            })
            .collect())
    }
}
