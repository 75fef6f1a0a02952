use crate::negotiation::{NegotiationState, NegotiationStep};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Send or receive failure on an otherwise open channel.
    #[error("signaling transport error: {0}")]
    Transport(String),

    #[error("signaling channel is not open")]
    ChannelClosed,

    #[error("malformed signal message: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{step} failed: {reason}")]
    Negotiation {
        step: NegotiationStep,
        reason: String,
    },

    #[error("cannot {op} while {state}")]
    InvalidState {
        op: &'static str,
        state: NegotiationState,
    },

    #[error("local media acquisition failed: {0}")]
    MediaAcquisition(String),
}

impl SessionError {
    pub(crate) fn negotiation(step: NegotiationStep, err: anyhow::Error) -> Self {
        SessionError::Negotiation {
            step,
            reason: format!("{err:#}"),
        }
    }
}
