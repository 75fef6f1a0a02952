use crate::channel::SignalingChannel;
use crate::latency::DelayHistory;
use duet_core::SignalMessage;
use std::collections::VecDeque;
use tracing::{debug, info};

/// How many unanswered ping timestamps are remembered for matching pongs.
const MAX_OUTSTANDING_PINGS: usize = 16;

/// Estimates peer-to-peer latency from each side's delay to the relay.
///
/// The clocks of the two peers are not synchronised, so only round trips
/// to the relay are timed. One-way delay is taken as half the round trip
/// and the peer-to-peer figure is the sum of both sides' one-way delays.
#[derive(Debug, Clone)]
pub struct LatencyEstimator {
    local_delay: Option<f64>,
    remote_delay: Option<f64>,
    history: DelayHistory,
    outstanding: VecDeque<f64>,
}

impl LatencyEstimator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            local_delay: None,
            remote_delay: None,
            history: DelayHistory::new(history_capacity),
            outstanding: VecDeque::with_capacity(MAX_OUTSTANDING_PINGS),
        }
    }

    /// Probe tick: send `ping{now}` and remember it.
    pub fn probe(&mut self, channel: &SignalingChannel, now: f64) {
        if channel.send(&SignalMessage::Ping { timestamp: now }).is_err() {
            return;
        }
        self.outstanding.push_back(now);
        while self.outstanding.len() > MAX_OUTSTANDING_PINGS {
            self.outstanding.pop_front();
        }
    }

    /// Feed one latency message. Other variants are ignored.
    pub fn handle(&mut self, channel: &SignalingChannel, msg: SignalMessage, now: f64) {
        match msg {
            SignalMessage::Ping { timestamp } => self.on_ping(channel, timestamp),
            SignalMessage::Pong { timestamp } => {
                self.on_pong(channel, timestamp, now);
            }
            SignalMessage::DelayReport { delay } => self.on_delay_report(delay),
            other => debug!("Estimator ignoring {} message", other.tag()),
        }
    }

    /// Pure reflection: echo the timestamp back untouched.
    pub fn on_ping(&self, channel: &SignalingChannel, timestamp: f64) {
        let _ = channel.send(&SignalMessage::Pong { timestamp });
    }

    /// Returns the new local delay when the pong answers one of our pings.
    pub fn on_pong(&mut self, channel: &SignalingChannel, timestamp: f64, now: f64) -> Option<f64> {
        let Some(pos) = self.outstanding.iter().position(|&t| t == timestamp) else {
            debug!("Ignoring pong for unknown ping {}", timestamp);
            return None;
        };
        self.outstanding.remove(pos);

        let rtt = now - timestamp;
        let delay = rtt / 2.0;
        self.local_delay = Some(delay);
        debug!("Relay round trip {} ms, local delay {} ms", rtt, delay);
        self.record();

        let _ = channel.send(&SignalMessage::DelayReport { delay });
        Some(delay)
    }

    pub fn on_delay_report(&mut self, delay: f64) {
        debug!("Peer reports relay delay {} ms", delay);
        self.remote_delay = Some(delay);
        self.record();
    }

    /// Forget unanswered pings, e.g. when the channel goes away.
    pub fn cancel_probes(&mut self) {
        if !self.outstanding.is_empty() {
            info!("Discarding {} unanswered pings", self.outstanding.len());
        }
        self.outstanding.clear();
    }

    pub fn local_delay(&self) -> Option<f64> {
        self.local_delay
    }

    pub fn remote_delay(&self) -> Option<f64> {
        self.remote_delay
    }

    /// Current local + remote estimate, once both sides are known.
    pub fn pair_delay(&self) -> Option<f64> {
        Some(self.local_delay? + self.remote_delay?)
    }

    pub fn average_delay(&self) -> Option<f64> {
        self.history.average()
    }

    pub fn history(&self) -> &DelayHistory {
        &self.history
    }

    pub fn outstanding_pings(&self) -> usize {
        self.outstanding.len()
    }

    fn record(&mut self) {
        if let Some(pair) = self.pair_delay() {
            self.history.push(pair);
        }
    }
}
