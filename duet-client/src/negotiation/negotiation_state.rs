use std::fmt;

/// Lifecycle of the single peer connection.
///
/// `Closed` behaves like `Idle`: a fresh join may start over from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Closed,
}

impl NegotiationState {
    pub fn is_idle(self) -> bool {
        matches!(self, NegotiationState::Idle | NegotiationState::Closed)
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::Connecting => "connecting",
            NegotiationState::Connected => "connected",
            NegotiationState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// The negotiation step an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStep {
    CreateConnection,
    AttachTrack,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    SetRemoteDescription,
    AddCandidate,
}

impl fmt::Display for NegotiationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NegotiationStep::CreateConnection => "creating the peer connection",
            NegotiationStep::AttachTrack => "attaching a local track",
            NegotiationStep::CreateOffer => "creating the offer",
            NegotiationStep::CreateAnswer => "creating the answer",
            NegotiationStep::SetLocalDescription => "setting the local description",
            NegotiationStep::SetRemoteDescription => "setting the remote description",
            NegotiationStep::AddCandidate => "adding a remote candidate",
        };
        f.write_str(s)
    }
}
