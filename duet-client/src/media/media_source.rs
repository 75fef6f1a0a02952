use crate::media::{LocalMedia, LocalTrack, TrackKind};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Media-capture primitive. Called once per join.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalMedia>;
}

/// Produces sample-driven Opus/VP8 tracks without touching any device.
/// Whatever feeds samples into them lives outside the session.
#[derive(Debug, Clone)]
pub struct SyntheticMediaSource {
    pub audio: bool,
    pub video: bool,
    pub stream_id: String,
}

impl Default for SyntheticMediaSource {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
            stream_id: "duet-local".to_string(),
        }
    }
}

#[async_trait]
impl MediaSource for SyntheticMediaSource {
    async fn acquire(&self) -> Result<LocalMedia> {
        if !self.audio && !self.video {
            bail!("no media kinds enabled");
        }

        let mut tracks = Vec::new();
        if self.audio {
            let track = TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48000,
                    channels: 2,
                    ..Default::default()
                },
                "audio".to_owned(),
                self.stream_id.clone(),
            );
            tracks.push(LocalTrack::new(TrackKind::Audio, Arc::new(track)));
        }
        if self.video {
            let track = TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    clock_rate: 90000,
                    ..Default::default()
                },
                "video".to_owned(),
                self.stream_id.clone(),
            );
            tracks.push(LocalTrack::new(TrackKind::Video, Arc::new(track)));
        }

        debug!("Acquired {} synthetic tracks", tracks.len());
        Ok(LocalMedia::new(self.stream_id.clone(), tracks))
    }
}
