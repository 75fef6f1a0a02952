use crate::channel::{self, ChannelEvent, SignalingChannel};
use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::latency::LatencyEstimator;
use crate::media::{LogRenderer, MediaSource, RenderSurface, SyntheticMediaSource};
use crate::negotiation::NegotiationMachine;
use crate::session::{SessionCommand, SessionHandle, SessionSnapshot};
use crate::transport::{PeerConnector, PeerEvent, RtcConnector};
use duet_core::{Decoded, decode};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

/// External primitives the session drives but does not implement.
#[derive(Clone)]
pub struct Collaborators {
    pub connector: Arc<dyn PeerConnector>,
    pub media: Arc<dyn MediaSource>,
    pub renderer: Arc<dyn RenderSurface>,
    pub clock: Arc<dyn Clock>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            connector: Arc::new(RtcConnector),
            media: Arc::new(SyntheticMediaSource::default()),
            renderer: Arc::new(LogRenderer),
            clock: Arc::new(SystemClock::new()),
        }
    }
}

/// Single event loop gluing channel, estimator and negotiation together.
///
/// Channel events, user commands, peer callbacks and probe ticks are handled
/// one at a time; a reaction that awaits (e.g. creating an offer) holds
/// the loop until it finishes.
pub struct SessionController {
    config: SessionConfig,
    channel: SignalingChannel,
    channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    peer_rx: mpsc::Receiver<PeerEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    estimator: LatencyEstimator,
    negotiation: NegotiationMachine,
    clock: Arc<dyn Clock>,
    probe: Option<Interval>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        channel: SignalingChannel,
        channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
        collaborators: Collaborators,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (peer_tx, peer_rx) = mpsc::channel(256);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let negotiation = NegotiationMachine::new(
            collaborators.connector,
            collaborators.media,
            collaborators.renderer,
            config.transport.clone(),
            peer_tx,
        );

        let controller = Self {
            estimator: LatencyEstimator::new(config.history_capacity),
            config,
            channel,
            channel_rx,
            command_rx,
            peer_rx,
            snapshot_tx,
            negotiation,
            clock: collaborators.clock,
            probe: None,
        };

        (controller, SessionHandle::new(command_tx, snapshot_rx))
    }

    /// Dial the relay named in `config` and build a controller on top of it.
    pub async fn connect(
        config: SessionConfig,
        collaborators: Collaborators,
    ) -> Result<(Self, SessionHandle), SessionError> {
        let (channel, channel_rx) = channel::connect(&config.relay_url).await?;
        Ok(Self::new(config, channel, channel_rx, collaborators))
    }

    pub async fn run(mut self) {
        info!("Session event loop started");

        loop {
            tokio::select! {
                evt = self.channel_rx.recv() => {
                    match evt {
                        Some(ChannelEvent::Closed) | None => {
                            info!("Signaling channel closed. Ending session.");
                            self.stop().await;
                            break;
                        }
                        Some(e) => self.handle_channel_event(e).await,
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Shutdown) | None => {
                            info!("Session shutdown requested");
                            self.stop().await;
                            break;
                        }
                        Some(c) => self.handle_command(c).await,
                    }
                }

                Some(evt) = self.peer_rx.recv() => {
                    self.negotiation.handle_peer_event(&self.channel, evt);
                }

                _ = next_probe(&mut self.probe) => {
                    let now = self.clock.now_ms();
                    self.estimator.probe(&self.channel, now);
                }
            }

            self.publish();
        }

        self.publish();
        info!("Session event loop finished");
    }

    async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Opened => {
                info!("Signaling channel open, probing every {:?}", self.config.probe_interval);
                self.channel.mark_open();

                let period = self.config.probe_interval;
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.probe = Some(interval);
            }
            ChannelEvent::Message(text) => self.route(&text).await,
            ChannelEvent::Error(e) => warn!("Signaling channel error: {}", e),
            // Handled by the loop before dispatch.
            ChannelEvent::Closed => {}
        }
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Join => {
                if let Err(e) = self.negotiation.join(&self.channel).await {
                    warn!("Join aborted: {}", e);
                }
            }
            SessionCommand::Leave => self.negotiation.disconnect().await,
            SessionCommand::Shutdown => {}
        }
    }

    /// Classify by tag and hand the message to whoever owns it.
    async fn route(&mut self, text: &str) {
        let msg = match decode(text) {
            Ok(Decoded::Message(msg)) => msg,
            Ok(Decoded::Unrecognized(tag)) => {
                warn!("Ignoring signal message with unknown type '{}'", tag);
                return;
            }
            Err(e) => {
                warn!("Dropping malformed signal message: {}", e);
                return;
            }
        };

        if msg.is_latency() {
            let now = self.clock.now_ms();
            self.estimator.handle(&self.channel, msg, now);
            return;
        }

        let tag = msg.tag();
        if let Err(e) = self.negotiation.handle_signal(&self.channel, msg).await {
            warn!("Failed to handle {} message: {}", tag, e);
        }
    }

    /// Cancel probing and release every negotiation resource.
    async fn stop(&mut self) {
        self.probe = None;
        self.channel.mark_closed();
        self.estimator.cancel_probes();
        self.negotiation.teardown().await;
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(SessionSnapshot {
            channel_open: self.channel.is_open(),
            joined: self.negotiation.is_joined(),
            negotiation: self.negotiation.state(),
            local_delay: self.estimator.local_delay(),
            remote_delay: self.estimator.remote_delay(),
            pair_delay: self.estimator.pair_delay(),
            average_delay: self.estimator.average_delay(),
        });
    }
}

/// Resolves on the next probe tick; never resolves while probing is off.
async fn next_probe(probe: &mut Option<Interval>) {
    match probe {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
