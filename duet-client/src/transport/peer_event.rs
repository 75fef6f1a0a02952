use crate::media::TrackKind;
use duet_core::IceCandidateInit;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

/// Distinguishes successive peer connections so late callbacks from a
/// closed one can be recognised and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteTrackInfo {
    pub track_id: String,
    pub stream_id: String,
    pub kind: TrackKind,
}

/// Callbacks raised by a peer connection, funnelled into the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEventKind {
    /// A local connectivity candidate was gathered and must reach the peer.
    CandidateGenerated(IceCandidateInit),
    /// The remote side started sending media.
    RemoteTrack(RemoteTrackInfo),
    StateChanged(LinkState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeerEvent {
    pub link: LinkId,
    pub kind: PeerEventKind,
}

/// Cloneable handle a peer link uses to report its callbacks.
#[derive(Debug, Clone)]
pub struct PeerEventSink {
    link: LinkId,
    tx: mpsc::Sender<PeerEvent>,
}

impl PeerEventSink {
    pub fn new(link: LinkId, tx: mpsc::Sender<PeerEvent>) -> Self {
        Self { link, tx }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    pub async fn emit(&self, kind: PeerEventKind) {
        let event = PeerEvent {
            link: self.link,
            kind,
        };
        if self.tx.send(event).await.is_err() {
            debug!("{} event dropped, session loop is gone", self.link);
        }
    }
}
