use duet_core::{DEFAULT_STUN_ADDR, IceServerConfig};

/// Configuration handed to every peer connection this client creates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_ADDR)],
        }
    }
}
