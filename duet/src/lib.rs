pub use duet_core::{ClientId, DEFAULT_STUN_ADDR, SignalMessage};

pub mod model {
    pub use duet_core::model::*;
}

pub mod codec {
    pub use duet_core::codec::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use duet_client::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use duet_relay::*;
}
