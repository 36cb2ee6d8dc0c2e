use crate::ClientError;
use crate::session::ConnectionState;
use gambit_core::GameMove;
use tokio::sync::{mpsc, watch};

/// Commands the front end sends into the session loop.
#[derive(Debug)]
pub enum SessionCommand {
    SendChat(String),
    SendMove(GameMove),
    Leave,
}

/// Cloneable front-end handle to a running [`super::Session`].
///
/// Outgoing messages sent before the data channel is bound are silently
/// dropped, mirroring the wire contract — there is no queue-and-flush.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl SessionHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<SessionCommand>,
        state_rx: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self { cmd_tx, state_rx }
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.cmd_tx
            .send(SessionCommand::SendChat(text.into()))
            .await
            .map_err(|_| ClientError::SessionClosed)
    }

    pub async fn send_move(&self, mv: GameMove) -> Result<(), ClientError> {
        self.cmd_tx
            .send(SessionCommand::SendMove(mv))
            .await
            .map_err(|_| ClientError::SessionClosed)
    }

    /// Ask the session to tear down. Safe to call more than once; after the
    /// loop exits this is a no-op.
    pub async fn leave(&self) {
        let _ = self.cmd_tx.send(SessionCommand::Leave).await;
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Render gate: true once negotiation completed.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Await the next state change. `None` once the session is gone.
    pub async fn state_changed(&mut self) -> Option<ConnectionState> {
        self.state_rx.changed().await.ok()?;
        Some(*self.state_rx.borrow())
    }
}
