use crate::transport::TransportConfig;
use std::time::Duration;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint of the relay.
    pub relay_url: String,
    pub probe_interval: Duration,
    pub history_capacity: usize,
    pub transport: TransportConfig,
}

impl SessionConfig {
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into(),
            probe_interval: DEFAULT_PROBE_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            transport: TransportConfig::default(),
        }
    }
}
