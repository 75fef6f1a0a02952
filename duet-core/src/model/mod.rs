mod client;
mod ice;
mod signaling;

pub use client::ClientId;
pub use ice::{IceCandidateInit, IceServerConfig};
pub use signaling::SignalMessage;
