use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_offer_reaches_other_client_only() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(2).await;

    let offer = r#"{"type":"offer","sdp":"v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\n"}"#;
    a.send_text(offer).await;

    assert_eq!(b.recv_text().await, offer);
    assert_eq!(a.try_recv_text(Duration::from_millis(200)).await, None);
}

#[tokio::test]
async fn test_delay_report_and_unknown_tags_are_forwarded_verbatim() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(2).await;

    let report = r#"{"type":"delay-report","delay":12.5}"#;
    let unknown = r#"{"type":"chat","text":"hello"}"#;
    b.send_text(report).await;
    b.send_text(unknown).await;

    assert_eq!(a.recv_text().await, report);
    assert_eq!(a.recv_text().await, unknown);
}

#[tokio::test]
async fn test_candidate_fans_out_to_every_other_client() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    let mut c = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(3).await;

    let candidate = r#"{"type":"candidate","candidate":{"candidate":"candidate:1 1 udp 1 10.0.0.1 9 typ host","sdpMid":"0","sdpMLineIndex":0}}"#;
    a.send_text(candidate).await;

    assert_eq!(b.recv_text().await, candidate);
    assert_eq!(c.recv_text().await, candidate);
}
