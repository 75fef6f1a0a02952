use crate::media::LocalMedia;
use crate::transport::RemoteTrackInfo;
use tracing::info;

/// Where streams are displayed. The session only attaches and clears.
pub trait RenderSurface: Send + Sync {
    fn show_local(&self, media: &LocalMedia);

    fn show_remote(&self, track: &RemoteTrackInfo);

    fn clear(&self);
}

/// Headless surface that reports what would be on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer;

impl RenderSurface for LogRenderer {
    fn show_local(&self, media: &LocalMedia) {
        info!(
            "Rendering local stream {} ({} tracks)",
            media.stream_id(),
            media.tracks().len()
        );
    }

    fn show_remote(&self, track: &RemoteTrackInfo) {
        info!(
            "Rendering remote {} track {} of stream {}",
            track.kind, track.track_id, track.stream_id
        );
    }

    fn clear(&self) {
        info!("Cleared rendered streams");
    }
}
