use livecast_core::{DeviceError, DeviceList, MediaConstraints};
use tracing::{debug, info, warn};

use crate::platform::{CaptureRequest, MediaDevices, MediaStream, MediaTrack};

/// Owns the single capture stream of a session.
///
/// At most one stream is held at a time; acquiring always releases first, and
/// only this type ever stops local tracks.
pub struct DeviceManager<D: MediaDevices> {
    devices: D,
    stream: Option<D::Stream>,
}

impl<D: MediaDevices> DeviceManager<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            stream: None,
        }
    }

    /// Requests permission with any-device constraints, enumerates, then releases the probe stream.
    ///
    /// Enumeration happens while the probe stream is still live because some browsers
    /// only report labels to pages holding an active capture. Results are never cached:
    /// labels may come back empty after release and callers must probe again.
    pub async fn probe(&mut self) -> Result<DeviceList, DeviceError> {
        self.release();

        let stream = self
            .devices
            .get_user_media(&CaptureRequest::Any)
            .await
            .map_err(DeviceError::from)?;
        debug!("Probe stream {} obtained", stream.id());
        self.stream = Some(stream);

        let listed = self.devices.enumerate_devices().await;
        self.release();

        let devices = DeviceList::new(listed.map_err(DeviceError::from)?);
        if devices.is_empty() {
            return Err(DeviceError::NoDeviceFound(
                "enumeration returned no capture devices".into(),
            ));
        }

        let unlabeled = devices.all().iter().filter(|d| d.label.is_empty()).count();
        if unlabeled > 0 {
            warn!("{} of {} devices reported no label", unlabeled, devices.len());
        }
        info!("Probed {} capture devices", devices.len());

        Ok(devices)
    }

    /// Closes the held stream, then captures with the given snapshot.
    pub async fn acquire(
        &mut self,
        constraints: &MediaConstraints,
    ) -> Result<D::Stream, DeviceError> {
        self.release();

        info!(
            "Acquiring stream: audio {:?}, video {:?}",
            constraints.audio_device_id(),
            constraints.video_device_id()
        );

        let stream = self
            .devices
            .get_user_media(&CaptureRequest::Exact(constraints.clone()))
            .await
            .map_err(DeviceError::from)?;

        info!("Obtained stream with id: {}", stream.id());
        self.stream = Some(stream.clone());
        Ok(stream)
    }

    /// Stops every track of the held stream. No-op when nothing is held.
    pub fn release(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        info!("Closing stream with id: {}", stream.id());
        for track in stream.tracks() {
            track.stop();
        }
    }

    pub fn stream(&self) -> Option<&D::Stream> {
        self.stream.as_ref()
    }

    pub fn platform(&self) -> &D {
        &self.devices
    }
}
