use duet_client::NegotiationState;
use duet_client::media::TrackKind;
use duet_client::transport::{LinkState, PeerEventKind, RemoteTrackInfo, SdpKind};
use duet_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{LinkCall, RenderEvent, TestSession};

#[tokio::test]
async fn test_offer_answer_cycle_connects_both_peers() {
    init_tracing();

    let mut caller = TestSession::start();
    let mut callee = TestSession::start();
    caller.open().await;
    callee.open().await;

    caller.handle.join().await.unwrap();
    let offer = caller.next_sent().await;
    let SignalMessage::Offer { sdp: offer_sdp } = offer.clone() else {
        panic!("Expected an offer, got {offer:?}");
    };

    callee.deliver(&offer);
    let answer = callee.next_sent().await;
    let SignalMessage::Answer { sdp: answer_sdp } = answer.clone() else {
        panic!("Expected an answer, got {answer:?}");
    };
    callee
        .wait_for(|s| s.negotiation == NegotiationState::Connecting)
        .await;

    caller.deliver(&answer);

    caller
        .connector
        .link(0)
        .emit(PeerEventKind::StateChanged(LinkState::Connected))
        .await;
    callee
        .connector
        .link(0)
        .emit(PeerEventKind::StateChanged(LinkState::Connected))
        .await;

    caller
        .wait_for(|s| s.negotiation == NegotiationState::Connected)
        .await;
    let callee_state = callee
        .wait_for(|s| s.negotiation == NegotiationState::Connected)
        .await;
    assert!(!callee_state.joined, "Answering does not count as joining");

    let caller_calls = caller.connector.link(0).calls();
    assert!(caller_calls.contains(&LinkCall::SetRemote(SdpKind::Answer, answer_sdp)));

    let callee_calls = callee.connector.link(0).calls();
    assert_eq!(
        callee_calls,
        vec![
            LinkCall::SetRemote(SdpKind::Offer, offer_sdp),
            LinkCall::CreateAnswer,
            LinkCall::SetLocal(SdpKind::Answer, "v=0 answer from link#1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_link_connected_before_answer_waits_for_descriptions() {
    init_tracing();

    let mut caller = TestSession::start();
    caller.open().await;
    caller.handle.join().await.unwrap();
    assert!(matches!(caller.next_sent().await, SignalMessage::Offer { .. }));

    caller
        .connector
        .link(0)
        .emit(PeerEventKind::StateChanged(LinkState::Connected))
        .await;
    caller.sync(1.0).await;
    assert_eq!(
        caller.handle.snapshot().negotiation,
        NegotiationState::Connecting
    );

    caller.deliver(&SignalMessage::Answer {
        sdp: "v=0 answer".to_string(),
    });
    caller
        .wait_for(|s| s.negotiation == NegotiationState::Connected)
        .await;
}

#[tokio::test]
async fn test_answer_without_offer_is_ignored() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;

    peer.deliver(&SignalMessage::Answer {
        sdp: "v=0 stray".to_string(),
    });
    peer.sync(1.0).await;

    assert_eq!(peer.connector.link_count(), 0);
    assert_eq!(peer.handle.snapshot().negotiation, NegotiationState::Idle);
}

#[tokio::test]
async fn test_remote_track_is_rendered() {
    init_tracing();

    let mut peer = TestSession::start();
    peer.open().await;
    peer.handle.join().await.unwrap();
    assert!(matches!(peer.next_sent().await, SignalMessage::Offer { .. }));

    peer.connector
        .link(0)
        .emit(PeerEventKind::RemoteTrack(RemoteTrackInfo {
            track_id: "remote-video".to_string(),
            stream_id: "remote".to_string(),
            kind: TrackKind::Video,
        }))
        .await;

    let renderer = peer.renderer.clone();
    crate::utils::eventually(move || {
        renderer
            .events()
            .contains(&RenderEvent::Remote("remote-video".to_string()))
    })
    .await;
}
