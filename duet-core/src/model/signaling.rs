use crate::model::ice::IceCandidateInit;
use serde::{Deserialize, Serialize};

/// Messages exchanged with the relay.
///
/// `timestamp` is the sender's own clock in milliseconds and is only ever
/// compared against the same sender's clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalMessage {
    Ping { timestamp: f64 },
    Pong { timestamp: f64 },
    DelayReport { delay: f64 },
    Offer { sdp: String },
    Answer { sdp: String },
    Candidate { candidate: IceCandidateInit },
}

impl SignalMessage {
    pub const TAGS: [&'static str; 6] = [
        "ping",
        "pong",
        "delay-report",
        "offer",
        "answer",
        "candidate",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SignalMessage::Ping { .. } => "ping",
            SignalMessage::Pong { .. } => "pong",
            SignalMessage::DelayReport { .. } => "delay-report",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::Candidate { .. } => "candidate",
        }
    }

    /// Probe traffic is answered by the relay and the estimator, never by negotiation.
    pub fn is_latency(&self) -> bool {
        matches!(
            self,
            SignalMessage::Ping { .. }
                | SignalMessage::Pong { .. }
                | SignalMessage::DelayReport { .. }
        )
    }
}
