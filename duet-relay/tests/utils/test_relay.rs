use duet_relay::{RelayService, serve};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub struct TestRelay {
    pub addr: SocketAddr,
    pub service: RelayService,
}

impl TestRelay {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test relay");
        let addr = listener.local_addr().unwrap();
        let service = RelayService::new();

        tokio::spawn(serve(listener, service.clone()));

        Self { addr, service }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Wait until exactly `n` clients are registered.
    pub async fn wait_for_clients(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.service.client_count() != n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("Relay never reached {n} clients"));
    }
}
