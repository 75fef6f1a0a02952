//! Two-party call client: signaling channel, offer/answer negotiation and
//! relay-based latency estimation.

pub mod channel;
pub mod clock;
pub mod config;
pub mod error;
pub mod latency;
pub mod media;
pub mod negotiation;
pub mod session;
pub mod transport;

pub use channel::{ChannelEvent, SignalingChannel};
pub use clock::{Clock, SystemClock};
pub use config::SessionConfig;
pub use error::SessionError;
pub use latency::{DelayHistory, LatencyEstimator};
pub use negotiation::{NegotiationMachine, NegotiationState};
pub use session::{Collaborators, SessionController, SessionHandle, SessionSnapshot};
pub use transport::TransportConfig;
