use crate::media::{LocalTrack, TrackKind};
use crate::transport::{
    LinkId, LinkState, PeerConnector, PeerEventKind, PeerEventSink, PeerLink, RemoteTrackInfo,
    SdpKind, TransportConfig,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use duet_core::IceCandidateInit;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Creates `RtcPeerLink`s backed by the `webrtc` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcConnector;

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn create(
        &self,
        config: &TransportConfig,
        events: PeerEventSink,
    ) -> Result<Box<dyn PeerLink>> {
        let link = RtcPeerLink::new(config, events).await?;
        Ok(Box::new(link))
    }
}

pub struct RtcPeerLink {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcPeerLink {
    pub async fn new(config: &TransportConfig, events: PeerEventSink) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Each callback gets its own sink clone: the closures must be 'static.
        let state_events = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let events = state_events.clone();
                Box::pin(async move {
                    info!("{} connection state changed: {:?}", events.link(), s);
                    events
                        .emit(PeerEventKind::StateChanged(link_state(s)))
                        .await;
                })
            },
        ));

        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();
            Box::pin(async move {
                // `None` marks the end of gathering.
                let Some(candidate) = c else { return };
                if let Some(init) = local_candidate(events.link(), &candidate) {
                    events.emit(PeerEventKind::CandidateGenerated(init)).await;
                }
            })
        }));

        let track_events = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        _ => TrackKind::Video,
                    };
                    let info = RemoteTrackInfo {
                        track_id: track.id(),
                        stream_id: track.stream_id(),
                        kind,
                    };
                    debug!("{} remote track {:?}", events.link(), info);
                    events.emit(PeerEventKind::RemoteTrack(info)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerLink for RtcPeerLink {
    async fn create_offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(answer.sdp)
    }

    async fn set_local_description(&self, kind: SdpKind, sdp: String) -> Result<()> {
        self.peer_connection
            .set_local_description(description(kind, sdp)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<()> {
        self.peer_connection
            .set_remote_description(description(kind, sdp)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidateInit) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn add_track(&self, track: &LocalTrack) -> Result<()> {
        let local: Arc<dyn TrackLocal + Send + Sync> = track.local();
        self.peer_connection
            .add_track(local)
            .await
            .with_context(|| format!("Failed to add {} track {}", track.kind(), track.id()))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn description(kind: SdpKind, sdp: String) -> Result<RTCSessionDescription> {
    let desc = match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
    };
    Ok(desc)
}

fn link_state(s: RTCPeerConnectionState) -> LinkState {
    match s {
        RTCPeerConnectionState::Connecting => LinkState::Connecting,
        RTCPeerConnectionState::Connected => LinkState::Connected,
        RTCPeerConnectionState::Disconnected => LinkState::Disconnected,
        RTCPeerConnectionState::Failed => LinkState::Failed,
        RTCPeerConnectionState::Closed => LinkState::Closed,
        _ => LinkState::New,
    }
}

/// Wire form of a gathered candidate; `None` (logged) if it cannot be encoded.
fn local_candidate(link: LinkId, candidate: &RTCIceCandidate) -> Option<IceCandidateInit> {
    match candidate.to_json() {
        Ok(init) => Some(from_rtc_candidate(init)),
        Err(e) => {
            warn!("{} failed to serialize local candidate: {}", link, e);
            None
        }
    }
}

fn to_rtc_candidate(c: IceCandidateInit) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: c.candidate,
        sdp_mid: c.sdp_mid,
        sdp_mline_index: c.sdp_m_line_index,
        username_fragment: c.username_fragment,
    }
}

fn from_rtc_candidate(c: RTCIceCandidateInit) -> IceCandidateInit {
    IceCandidateInit {
        candidate: c.candidate,
        sdp_mid: c.sdp_mid,
        sdp_m_line_index: c.sdp_mline_index,
        username_fragment: c.username_fragment,
    }
}
