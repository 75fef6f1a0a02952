use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_ping_is_answered_to_sender() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(2).await;

    a.send_text(r#"{"type":"ping","timestamp":1712345678901.5}"#)
        .await;

    assert_eq!(
        a.recv_text().await,
        r#"{"type":"pong","timestamp":1712345678901.5}"#
    );
    assert_eq!(b.try_recv_text(Duration::from_millis(200)).await, None);
}

#[tokio::test]
async fn test_client_pong_goes_nowhere() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(2).await;

    a.send_text(r#"{"type":"pong","timestamp":1}"#).await;

    assert_eq!(a.try_recv_text(Duration::from_millis(200)).await, None);
    assert_eq!(b.try_recv_text(Duration::from_millis(200)).await, None);
}
