use crate::media::LocalTrack;
use crate::transport::{PeerEventSink, TransportConfig};
use anyhow::Result;
use async_trait::async_trait;
use duet_core::IceCandidateInit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// One peer connection as seen by the negotiation machine.
///
/// Implementations wrap a real WebRTC stack; the machine only sequences the
/// calls and never inspects SDP or candidates itself.
#[async_trait]
pub trait PeerLink: Send + Sync {
    async fn create_offer(&self) -> Result<String>;

    async fn create_answer(&self) -> Result<String>;

    async fn set_local_description(&self, kind: SdpKind, sdp: String) -> Result<()>;

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<()>;

    async fn add_track(&self, track: &LocalTrack) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Factory for peer links. Callbacks of the created link go to `events`.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn create(
        &self,
        config: &TransportConfig,
        events: PeerEventSink,
    ) -> Result<Box<dyn PeerLink>>;
}
