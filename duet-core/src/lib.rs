//! Wire model shared by the duet client and relay.

pub mod codec;
pub mod model;

pub use codec::{Decoded, decode, encode};
pub use model::{ClientId, IceCandidateInit, IceServerConfig, SignalMessage};

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
