/// Lifecycle and payload notifications from the relay connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Opened,
    /// Raw text frame, not yet parsed.
    Message(String),
    Error(String),
    Closed,
}
