use axum::extract::ws::Message;
use dashmap::DashMap;
use duet_core::{ClientId, Decoded, SignalMessage, decode, encode};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// What the relay does with one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayAction {
    /// Answer the sender only.
    Reply(SignalMessage),
    /// Pass the frame untouched to every other client.
    Forward,
    Drop,
}

/// Pings are answered here; pongs only ever come from the relay, so a client
/// sending one is dropped. Everything else, unknown tags included, is
/// forwarded.
pub fn classify(text: &str) -> RelayAction {
    match decode(text) {
        Ok(Decoded::Message(SignalMessage::Ping { timestamp })) => {
            RelayAction::Reply(SignalMessage::Pong { timestamp })
        }
        Ok(Decoded::Message(SignalMessage::Pong { .. })) => RelayAction::Drop,
        Ok(_) => RelayAction::Forward,
        Err(e) => {
            warn!("Malformed frame: {}", e);
            RelayAction::Drop
        }
    }
}

struct RelayInner {
    clients: DashMap<ClientId, mpsc::UnboundedSender<Message>>,
}

/// Registry of connected clients, shared by every socket task.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                clients: DashMap::new(),
            }),
        }
    }

    pub fn add_client(&self, client_id: ClientId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.clients.insert(client_id, tx);
    }

    pub fn remove_client(&self, client_id: &ClientId) {
        self.inner.clients.remove(client_id);
    }

    pub fn client_count(&self) -> usize {
        self.inner.clients.len()
    }

    pub fn send_to(&self, client_id: &ClientId, msg: &SignalMessage) {
        let Some(client) = self.inner.clients.get(client_id) else {
            warn!("Attempted to send {} to disconnected client {}", msg.tag(), client_id);
            return;
        };

        match encode(msg) {
            Ok(json) => {
                if let Err(e) = client.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", client_id, e);
                }
            }
            Err(e) => error!("Failed to serialize {} message: {}", msg.tag(), e),
        }
    }

    /// Send `text` to every client except `from`. Returns how many got it.
    pub fn broadcast_from(&self, from: &ClientId, text: &str) -> usize {
        let mut delivered = 0;
        for client in self.inner.clients.iter() {
            if client.key() == from {
                continue;
            }
            match client.value().send(Message::Text(text.into())) {
                Ok(()) => delivered += 1,
                Err(e) => error!("Failed to forward to {}: {:?}", client.key(), e),
            }
        }
        debug!("Forwarded frame from {} to {} clients", from, delivered);
        delivered
    }

    /// Apply `classify` to a frame received from `from`.
    pub fn handle_frame(&self, from: &ClientId, text: &str) {
        match classify(text) {
            RelayAction::Reply(reply) => self.send_to(from, &reply),
            RelayAction::Forward => {
                self.broadcast_from(from, text);
            }
            RelayAction::Drop => debug!("Dropped frame from {}", from),
        }
    }
}
