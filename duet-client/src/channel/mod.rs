mod channel_event;
mod signaling_channel;
mod ws_connect;

pub use channel_event::*;
pub use signaling_channel::*;
pub use ws_connect::*;
