use duet_client::NegotiationState;
use duet_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{RenderEvent, TestSession};

#[tokio::test]
async fn test_leave_right_after_join_releases_everything() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;

    peer.handle.join().await.unwrap();
    peer.handle.leave().await.unwrap();

    let snapshot = peer
        .wait_for(|s| !s.joined && s.negotiation == NegotiationState::Closed)
        .await;
    assert!(snapshot.channel_open, "Leaving keeps the relay connection");

    assert!(matches!(peer.next_sent().await, SignalMessage::Offer { .. }));
    let acquired = peer.media.acquired();
    assert_eq!(acquired.len(), 1);
    assert!(!acquired[0].any_live(), "Local tracks must be stopped");
    assert!(peer.connector.link(0).is_closed());
    assert_eq!(peer.renderer.events().last(), Some(&RenderEvent::Clear));
}

#[tokio::test]
async fn test_leave_while_idle_is_harmless() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;

    peer.handle.leave().await.unwrap();
    peer.wait_for(|s| s.negotiation == NegotiationState::Closed)
        .await;

    assert_eq!(peer.connector.link_count(), 0);
    peer.sync(1.0).await;
}

#[tokio::test]
async fn test_callee_can_answer_after_leave() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;

    peer.handle.leave().await.unwrap();
    peer.wait_for(|s| s.negotiation == NegotiationState::Closed)
        .await;

    peer.deliver(&SignalMessage::Offer {
        sdp: "v=0 offer".to_string(),
    });
    assert!(matches!(peer.next_sent().await, SignalMessage::Answer { .. }));
    peer.wait_for(|s| s.negotiation == NegotiationState::Connecting)
        .await;
}

#[tokio::test]
async fn test_shutdown_ends_the_loop() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;
    peer.handle.join().await.unwrap();
    assert!(matches!(peer.next_sent().await, SignalMessage::Offer { .. }));

    peer.handle.shutdown().await.unwrap();
    peer.finished().await;

    let snapshot = peer.handle.snapshot();
    assert!(!snapshot.channel_open);
    assert!(!snapshot.joined);
    assert_eq!(snapshot.negotiation, NegotiationState::Idle);
    assert!(peer.connector.link(0).is_closed());
    assert!(peer.handle.join().await.is_err());
}
