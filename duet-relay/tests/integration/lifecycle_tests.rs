use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut a = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(1).await;

    a.send_text("{this is not json").await;
    a.send_text(r#"{"type":"ping","timestamp":3}"#).await;

    assert_eq!(a.recv_text().await, r#"{"type":"pong","timestamp":3.0}"#);
    assert_eq!(relay.service.client_count(), 1);
}

#[tokio::test]
async fn test_disconnected_client_is_unregistered() {
    init_tracing();

    let relay = TestRelay::start().await;
    let a = TestClient::connect(&relay.url()).await;
    let mut b = TestClient::connect(&relay.url()).await;
    relay.wait_for_clients(2).await;

    a.close().await;
    relay.wait_for_clients(1).await;

    // The remaining client is still served
    b.send_text(r#"{"type":"ping","timestamp":4}"#).await;
    assert_eq!(b.recv_text().await, r#"{"type":"pong","timestamp":4.0}"#);
}

#[tokio::test]
async fn test_health_endpoint() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = TcpStream::connect(relay.addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("OK"));
}
