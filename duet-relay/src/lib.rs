//! WebSocket relay for two-party calls: answers latency pings itself and
//! fans every other signaling frame out to the remaining clients.

pub mod config;
pub mod server;
pub mod signaling;

pub use config::{DEFAULT_BIND, RelayConfig};
pub use server::{router, run, serve};
pub use signaling::{RelayAction, RelayService, classify, ws_handler};
