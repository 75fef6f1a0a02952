use duet_client::transport::{LinkState, PeerEventKind};
use duet_client::{
    Collaborators, NegotiationState, SessionConfig, SessionController, SessionHandle,
    SessionSnapshot, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;

use super::{start_relay, wait_for_clients};
use crate::integration::init_tracing;
use crate::utils::{MockConnector, MockMediaSource, RecordingRenderer};

async fn start_peer(url: &str, connector: MockConnector) -> SessionHandle {
    let mut config = SessionConfig::new(url);
    config.probe_interval = Duration::from_millis(50);

    let collaborators = Collaborators {
        connector: Arc::new(connector),
        media: Arc::new(MockMediaSource::default()),
        renderer: Arc::new(RecordingRenderer::default()),
        clock: Arc::new(SystemClock::new()),
    };
    let (controller, handle) = SessionController::connect(config, collaborators)
        .await
        .expect("Failed to connect to relay");
    tokio::spawn(controller.run());
    handle
}

async fn wait_for(handle: &SessionHandle, pred: impl Fn(&SessionSnapshot) -> bool) -> SessionSnapshot {
    let mut rx = handle.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(|s| pred(s)))
        .await
        .expect("Timed out waiting for snapshot")
        .expect("Session loop stopped");
    *snapshot
}

async fn wait_for_link(connector: &MockConnector) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while connector.link_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("No peer connection was created");
}

#[tokio::test]
async fn test_two_peers_negotiate_and_measure_latency() {
    init_tracing();

    let (url, service) = start_relay().await;
    let caller_links = MockConnector::default();
    let callee_links = MockConnector::default();
    let caller = start_peer(&url, caller_links.clone()).await;
    let callee = start_peer(&url, callee_links.clone()).await;
    wait_for_clients(&service, 2).await;
    wait_for(&caller, |s| s.channel_open).await;
    wait_for(&callee, |s| s.channel_open).await;

    caller.join().await.unwrap();

    // The callee answers on its own once the offer arrives
    wait_for(&callee, |s| s.negotiation == NegotiationState::Connecting).await;
    wait_for_link(&callee_links).await;
    callee_links
        .link(0)
        .emit(PeerEventKind::StateChanged(LinkState::Connected))
        .await;
    caller_links
        .link(0)
        .emit(PeerEventKind::StateChanged(LinkState::Connected))
        .await;

    let caller_state = wait_for(&caller, |s| s.negotiation == NegotiationState::Connected).await;
    let callee_state = wait_for(&callee, |s| s.negotiation == NegotiationState::Connected).await;
    assert!(caller_state.joined);
    assert!(!callee_state.joined);

    // Both sides probe the relay and exchange their delays
    let caller_state = wait_for(&caller, |s| s.pair_delay.is_some()).await;
    let callee_state = wait_for(&callee, |s| s.pair_delay.is_some()).await;
    assert!(caller_state.local_delay.unwrap() >= 0.0);
    assert!(callee_state.remote_delay.unwrap() >= 0.0);
    assert!(caller_state.average_delay.is_some());

    caller.shutdown().await.unwrap();
    wait_for_clients(&service, 1).await;
}
