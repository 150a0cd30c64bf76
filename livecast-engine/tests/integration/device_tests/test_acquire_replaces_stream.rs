use livecast_engine::{CaptureRequest, DeviceManager, MediaConstraints, MediaStream};

use crate::integration::init_tracing;
use crate::utils::MockDevices;

#[tokio::test]
async fn test_acquire_replaces_stream() {
    init_tracing();

    let devices = MockDevices::new();
    let mut manager = DeviceManager::new(devices.clone());
    let constraints = MediaConstraints::default().with_video_device("cam-1");

    let first = manager.acquire(&constraints).await.expect("First acquire failed");
    let second = manager
        .acquire(&constraints.clone().with_frame_rate(15))
        .await
        .expect("Second acquire failed");

    assert_ne!(first.id(), second.id());
    assert!(!first.is_live(), "previous stream must be stopped");
    assert!(second.is_live());
    assert_eq!(devices.live_streams(), 1);
    assert_eq!(
        manager.stream().map(|s| s.id()),
        Some(second.id()),
        "manager holds the newest stream"
    );

    let requests = devices.requests();
    assert!(
        matches!(&requests[1], CaptureRequest::Exact(c) if c.frame_rate() == 15),
        "second request carries the new snapshot"
    );
}

#[tokio::test]
async fn test_release_is_idempotent() {
    init_tracing();

    let devices = MockDevices::new();
    let mut manager = DeviceManager::new(devices.clone());
    let stream = manager
        .acquire(&MediaConstraints::default())
        .await
        .expect("Acquire failed");

    manager.release();
    manager.release();

    assert!(manager.stream().is_none());
    for track in stream.tracks() {
        assert_eq!(track.stop_count(), 1, "each track stopped exactly once");
    }
}
