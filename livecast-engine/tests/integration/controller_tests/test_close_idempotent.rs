use livecast_engine::{ConnectionRole, ControllerState, PeerConnectionState, PeerEvent};

use super::{ControllerFixture, open_controller};
use crate::integration::init_tracing;
use crate::utils::PeerCall;

#[tokio::test]
async fn test_close_releases_connection_once() {
    init_tracing();

    for role in ConnectionRole::ALL {
        let ControllerFixture {
            mut controller,
            peer,
            ..
        } = open_controller(role).await;

        controller.close().await;
        controller.close().await;
        controller.close().await;

        assert_eq!(controller.state(), ControllerState::Closed);
        assert_eq!(peer.close_count(), 1, "{role} closed more than once");
        let closes = peer.journal().iter().filter(|c| **c == PeerCall::Close).count();
        assert_eq!(closes, 1);
    }
}

#[tokio::test]
async fn test_close_after_failure_still_releases() {
    init_tracing();

    let ControllerFixture {
        mut controller,
        peer,
        ..
    } = open_controller(ConnectionRole::Source).await;

    controller.handle_platform_event(PeerEvent::ConnectionState(PeerConnectionState::Failed));
    assert_eq!(controller.state(), ControllerState::Failed);

    controller.close().await;
    assert_eq!(controller.state(), ControllerState::Closed);
    assert_eq!(peer.close_count(), 1);
}

#[tokio::test]
async fn test_cancel_flag_turns_operations_into_closed_errors() {
    init_tracing();

    let ControllerFixture {
        mut controller,
        peer,
        cancel,
        ..
    } = open_controller(ConnectionRole::Source).await;

    cancel.raise();
    let err = controller.create_and_send_offer().await.unwrap_err();
    assert!(matches!(
        err,
        livecast_engine::ControllerError::ClosedConnection { .. }
    ));
    assert!(!peer.journal().contains(&PeerCall::CreateOffer));

    // Cancellation does not release the connection by itself.
    assert_eq!(peer.close_count(), 0);
    controller.close().await;
    assert_eq!(peer.close_count(), 1);
}
