use crate::negotiation::NegotiationState;

/// What a UI renders. Delays are in milliseconds; `None` means pending.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionSnapshot {
    pub channel_open: bool,
    pub joined: bool,
    pub negotiation: NegotiationState,
    pub local_delay: Option<f64>,
    pub remote_delay: Option<f64>,
    pub pair_delay: Option<f64>,
    pub average_delay: Option<f64>,
}
