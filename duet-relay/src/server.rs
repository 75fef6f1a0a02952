use crate::config::RelayConfig;
use crate::signaling::{RelayService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/health", get(health))
        .with_state(service)
}

async fn health() -> &'static str {
    "OK"
}

/// Serve the relay on an already bound listener until it fails.
pub async fn serve(listener: TcpListener, service: RelayService) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Relay listening on ws://{}", addr);
    axum::serve(listener, router(service))
        .await
        .context("Relay server stopped")?;
    Ok(())
}

pub async fn run(config: RelayConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind relay to {}", config.bind))?;
    serve(listener, RelayService::new()).await
}
