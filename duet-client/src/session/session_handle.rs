use crate::error::SessionError;
use crate::session::{SessionCommand, SessionSnapshot};
use tokio::sync::{mpsc, watch};

/// Cloneable front door to a running `SessionController`.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<SessionCommand>,
        snapshot_rx: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self {
            command_tx,
            snapshot_rx,
        }
    }

    pub async fn join(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Join).await
    }

    pub async fn leave(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Leave).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::Transport("session loop has stopped".into()))
    }
}
