use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

pub const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8765));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { bind: DEFAULT_BIND }
    }
}
