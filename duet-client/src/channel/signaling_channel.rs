use crate::error::SessionError;
use duet_core::{SignalMessage, encode};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound half of the relay connection, owned by the session.
///
/// Frames are handed to a writer task; `send` never blocks.
#[derive(Debug)]
pub struct SignalingChannel {
    outbound: mpsc::UnboundedSender<String>,
    open: bool,
}

impl SignalingChannel {
    pub fn new(outbound: mpsc::UnboundedSender<String>) -> Self {
        Self {
            outbound,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open && !self.outbound.is_closed()
    }

    pub fn mark_open(&mut self) {
        self.open = true;
    }

    pub fn mark_closed(&mut self) {
        self.open = false;
    }

    /// Serialize and queue `msg`. Failures are logged here; callers may
    /// ignore the result when a dropped frame is acceptable.
    pub fn send(&self, msg: &SignalMessage) -> Result<(), SessionError> {
        if !self.open {
            warn!("Dropping {} message: channel is not open", msg.tag());
            return Err(SessionError::ChannelClosed);
        }

        let json = encode(msg).map_err(|e| {
            warn!("Failed to serialize {} message: {}", msg.tag(), e);
            SessionError::Parse(e)
        })?;

        if self.outbound.send(json).is_err() {
            warn!("Dropping {} message: writer task has stopped", msg.tag());
            return Err(SessionError::Transport("writer task has stopped".into()));
        }

        debug!("WS OUT: {}", msg.tag());
        Ok(())
    }
}
