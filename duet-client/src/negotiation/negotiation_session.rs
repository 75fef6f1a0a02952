use crate::error::SessionError;
use crate::media::LocalMedia;
use crate::negotiation::NegotiationStep;
use crate::transport::{LinkId, PeerLink, RemoteTrackInfo};
use tracing::{debug, warn};

/// One peer connection plus what has been negotiated on it so far.
pub struct NegotiationSession {
    link_id: LinkId,
    link: Box<dyn PeerLink>,
    local_media: Option<LocalMedia>,
    remote_tracks: Vec<RemoteTrackInfo>,
    pub(crate) local_description_set: bool,
    pub(crate) remote_description_set: bool,
    pub(crate) offer_outstanding: bool,
    pub(crate) link_connected: bool,
}

impl NegotiationSession {
    pub(crate) fn new(link_id: LinkId, link: Box<dyn PeerLink>) -> Self {
        Self {
            link_id,
            link,
            local_media: None,
            remote_tracks: Vec::new(),
            local_description_set: false,
            remote_description_set: false,
            offer_outstanding: false,
            link_connected: false,
        }
    }

    pub fn link_id(&self) -> LinkId {
        self.link_id
    }

    pub(crate) fn link(&self) -> &dyn PeerLink {
        self.link.as_ref()
    }

    pub fn local_media(&self) -> Option<&LocalMedia> {
        self.local_media.as_ref()
    }

    pub fn remote_tracks(&self) -> &[RemoteTrackInfo] {
        &self.remote_tracks
    }

    pub fn has_local_description(&self) -> bool {
        self.local_description_set
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_description_set
    }

    pub fn offer_outstanding(&self) -> bool {
        self.offer_outstanding
    }

    pub(crate) fn descriptions_complete(&self) -> bool {
        self.local_description_set && self.remote_description_set
    }

    /// Take ownership of `media` and add each track to the connection. The
    /// media is owned from the first call on, so a later `close` stops it
    /// even when attaching fails halfway.
    pub(crate) async fn attach_media(&mut self, media: LocalMedia) -> Result<(), SessionError> {
        let media = self.local_media.insert(media);
        for track in media.tracks() {
            self.link
                .add_track(track)
                .await
                .map_err(|e| SessionError::negotiation(NegotiationStep::AttachTrack, e))?;
            debug!("{} attached {} track {}", self.link_id, track.kind(), track.id());
        }
        Ok(())
    }

    pub(crate) fn push_remote_track(&mut self, track: RemoteTrackInfo) {
        self.remote_tracks.push(track);
    }

    /// Stop local tracks and release the connection.
    pub(crate) async fn close(self) {
        if let Some(media) = &self.local_media {
            media.stop_all();
        }
        if let Err(e) = self.link.close().await {
            warn!("Failed to close {}: {:#}", self.link_id, e);
        }
        debug!("{} released", self.link_id);
    }
}
