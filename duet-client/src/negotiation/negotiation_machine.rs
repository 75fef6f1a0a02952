use crate::channel::SignalingChannel;
use crate::error::SessionError;
use crate::media::{LocalMedia, MediaSource, RenderSurface};
use crate::negotiation::{NegotiationSession, NegotiationState, NegotiationStep};
use crate::transport::{
    LinkId, LinkState, PeerConnector, PeerEvent, PeerEventKind, PeerEventSink, PeerLink, SdpKind,
    TransportConfig,
};
use duet_core::{IceCandidateInit, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drives offer/answer/candidate exchange for at most one peer connection.
///
/// Every operation either completes or leaves the machine in the state it
/// started from. Callers serialise calls, so no locking is involved.
pub struct NegotiationMachine {
    connector: Arc<dyn PeerConnector>,
    media: Arc<dyn MediaSource>,
    renderer: Arc<dyn RenderSurface>,
    transport: TransportConfig,
    events_tx: mpsc::Sender<PeerEvent>,
    state: NegotiationState,
    session: Option<NegotiationSession>,
    joined: bool,
    next_link: u64,
}

impl NegotiationMachine {
    pub fn new(
        connector: Arc<dyn PeerConnector>,
        media: Arc<dyn MediaSource>,
        renderer: Arc<dyn RenderSurface>,
        transport: TransportConfig,
        events_tx: mpsc::Sender<PeerEvent>,
    ) -> Self {
        Self {
            connector,
            media,
            renderer,
            transport,
            events_tx,
            state: NegotiationState::Idle,
            session: None,
            joined: false,
            next_link: 1,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn session(&self) -> Option<&NegotiationSession> {
        self.session.as_ref()
    }

    /// Caller side: capture media, open a fresh connection and send an offer.
    pub async fn join(&mut self, channel: &SignalingChannel) -> Result<(), SessionError> {
        if self.joined || !self.state.is_idle() {
            return Err(SessionError::InvalidState {
                op: "join",
                state: self.state,
            });
        }
        if !channel.is_open() {
            return Err(SessionError::ChannelClosed);
        }

        let media = self
            .media
            .acquire()
            .await
            .map_err(|e| SessionError::MediaAcquisition(format!("{e:#}")))?;
        info!("Acquired local media {}", media.stream_id());
        self.renderer.show_local(&media);

        let prior = self.state;
        match self.send_offer(channel, media.clone()).await {
            Ok(()) => {
                self.joined = true;
                Ok(())
            }
            Err(e) => {
                media.stop_all();
                self.release().await;
                self.state = prior;
                Err(e)
            }
        }
    }

    async fn send_offer(
        &mut self,
        channel: &SignalingChannel,
        media: LocalMedia,
    ) -> Result<(), SessionError> {
        let (link_id, link) = self.open_link().await?;
        let session = self.session.insert(NegotiationSession::new(link_id, link));
        session.attach_media(media).await?;
        self.state = NegotiationState::Connecting;

        let sdp = session
            .link()
            .create_offer()
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::CreateOffer, e))?;
        session
            .link()
            .set_local_description(SdpKind::Offer, sdp.clone())
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::SetLocalDescription, e))?;
        session.local_description_set = true;

        channel.send(&SignalMessage::Offer { sdp })?;
        session.offer_outstanding = true;
        info!("{} offer sent, awaiting answer", link_id);
        Ok(())
    }

    /// Dispatch an offer, answer or candidate. Latency messages are not ours.
    pub async fn handle_signal(
        &mut self,
        channel: &SignalingChannel,
        msg: SignalMessage,
    ) -> Result<(), SessionError> {
        match msg {
            SignalMessage::Offer { sdp } => self.handle_offer(channel, sdp).await,
            SignalMessage::Answer { sdp } => self.handle_answer(sdp).await,
            SignalMessage::Candidate { candidate } => self.handle_candidate(candidate).await,
            other => {
                debug!("Negotiation ignoring {} message", other.tag());
                Ok(())
            }
        }
    }

    /// Callee side: apply a remote offer and answer it.
    pub async fn handle_offer(
        &mut self,
        channel: &SignalingChannel,
        sdp: String,
    ) -> Result<(), SessionError> {
        let prior = self.state;
        let flags = self
            .session
            .as_ref()
            .map(|s| (s.local_description_set, s.remote_description_set));
        if flags.is_none() {
            let (link_id, link) = self.open_link().await?;
            self.session = Some(NegotiationSession::new(link_id, link));
        }

        let result = self.answer_offer(channel, sdp).await;
        if result.is_err() {
            self.state = prior;
            match flags {
                // The connection only existed for this offer.
                None => {
                    if let Some(session) = self.session.take() {
                        session.close().await;
                    }
                }
                Some((local, remote)) => {
                    if let Some(session) = self.session.as_mut() {
                        session.local_description_set = local;
                        session.remote_description_set = remote;
                    }
                }
            }
        }
        result
    }

    async fn answer_offer(
        &mut self,
        channel: &SignalingChannel,
        sdp: String,
    ) -> Result<(), SessionError> {
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::InvalidState {
                op: "answer an offer",
                state: self.state,
            });
        };
        let link_id = session.link_id();

        session
            .link()
            .set_remote_description(SdpKind::Offer, sdp)
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::SetRemoteDescription, e))?;
        session.remote_description_set = true;
        if self.state.is_idle() {
            self.state = NegotiationState::Connecting;
        }

        let answer = session
            .link()
            .create_answer()
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::CreateAnswer, e))?;
        session
            .link()
            .set_local_description(SdpKind::Answer, answer.clone())
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::SetLocalDescription, e))?;
        session.local_description_set = true;

        channel.send(&SignalMessage::Answer { sdp: answer })?;
        info!("{} answer sent", link_id);
        self.update_connected();
        Ok(())
    }

    /// Caller side: apply the answer to our outstanding offer.
    pub async fn handle_answer(&mut self, sdp: String) -> Result<(), SessionError> {
        let state = self.state;
        let Some(session) = self.session.as_mut() else {
            return Err(SessionError::InvalidState {
                op: "apply an answer",
                state,
            });
        };
        if !session.offer_outstanding {
            return Err(SessionError::InvalidState {
                op: "apply an answer without an offer",
                state,
            });
        }

        session
            .link()
            .set_remote_description(SdpKind::Answer, sdp)
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::SetRemoteDescription, e))?;
        session.remote_description_set = true;
        session.offer_outstanding = false;
        info!("{} answer applied", session.link_id());
        self.update_connected();
        Ok(())
    }

    /// Apply a remote candidate. Without a connection it is dropped, not queued.
    pub async fn handle_candidate(
        &mut self,
        candidate: IceCandidateInit,
    ) -> Result<(), SessionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(SessionError::InvalidState {
                op: "add a candidate without a peer connection",
                state: self.state,
            });
        };

        session
            .link()
            .add_ice_candidate(candidate)
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::AddCandidate, e))?;
        debug!("{} remote candidate added", session.link_id());
        Ok(())
    }

    /// React to a callback from the current link. Stale links are ignored.
    pub fn handle_peer_event(&mut self, channel: &SignalingChannel, event: PeerEvent) {
        let Some(session) = self.session.as_mut() else {
            debug!("Ignoring {:?} from {}: no peer connection", event.kind, event.link);
            return;
        };
        if event.link != session.link_id() {
            debug!("Ignoring event from stale {}", event.link);
            return;
        }

        match event.kind {
            PeerEventKind::CandidateGenerated(candidate) => {
                let _ = channel.send(&SignalMessage::Candidate { candidate });
            }
            PeerEventKind::RemoteTrack(track) => {
                info!("{} remote {} track arrived", event.link, track.kind);
                self.renderer.show_remote(&track);
                session.push_remote_track(track);
            }
            PeerEventKind::StateChanged(LinkState::Connected) => {
                session.link_connected = true;
                self.update_connected();
            }
            PeerEventKind::StateChanged(s @ (LinkState::Disconnected | LinkState::Failed)) => {
                session.link_connected = false;
                warn!("{} reported {:?}", event.link, s);
            }
            PeerEventKind::StateChanged(s) => debug!("{} is {:?}", event.link, s),
        }
    }

    /// User leave: release everything and end in `Closed`. Safe in any state.
    pub async fn disconnect(&mut self) {
        self.release().await;
        self.joined = false;
        self.state = NegotiationState::Closed;
        info!("Call disconnected");
    }

    /// Channel loss: release everything and return to `Idle`.
    pub async fn teardown(&mut self) {
        self.release().await;
        self.joined = false;
        self.state = NegotiationState::Idle;
    }

    async fn open_link(&mut self) -> Result<(LinkId, Box<dyn PeerLink>), SessionError> {
        let link_id = LinkId(self.next_link);
        self.next_link += 1;

        let sink = PeerEventSink::new(link_id, self.events_tx.clone());
        let link = self
            .connector
            .create(&self.transport, sink)
            .await
            .map_err(|e| SessionError::negotiation(NegotiationStep::CreateConnection, e))?;
        debug!("{} created", link_id);
        Ok((link_id, link))
    }

    async fn release(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
        self.renderer.clear();
    }

    fn update_connected(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.descriptions_complete()
            && session.link_connected
            && self.state != NegotiationState::Connected
        {
            info!("{} connected", session.link_id());
            self.state = NegotiationState::Connected;
        }
    }
}
