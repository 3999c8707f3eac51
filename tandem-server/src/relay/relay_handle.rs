use crate::relay::{RelayCommand, RelayError, RelayStats};
use crate::transport::{TransportReceiver, outbound_channel};
use tandem_core::ConnectionId;
use tokio::sync::{mpsc, oneshot};

/// Cloneable entry point into a running [`crate::RelayService`].
#[derive(Debug, Clone)]
pub struct RelayHandle {
    command_tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<RelayCommand>) -> Self {
        Self { command_tx }
    }

    /// Registers a new transport. The receiver yields everything the relay
    /// wants written to it; it ends when the relay drops the connection.
    pub async fn connect(&self) -> Result<(ConnectionId, TransportReceiver), RelayError> {
        let (transport, outbound_rx) = outbound_channel();
        let (reply, reply_rx) = oneshot::channel();

        self.send(RelayCommand::Connect { transport, reply }).await?;
        let id = reply_rx.await.map_err(|_| RelayError::ServiceUnavailable)?;

        Ok((id, outbound_rx))
    }

    pub async fn frame(
        &self,
        connection_id: ConnectionId,
        text: impl Into<String>,
    ) -> Result<(), RelayError> {
        self.send(RelayCommand::Frame {
            connection_id,
            text: text.into(),
        })
        .await
    }

    pub async fn probe_response(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.send(RelayCommand::ProbeResponse { connection_id }).await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), RelayError> {
        self.send(RelayCommand::Disconnect { connection_id }).await
    }

    pub async fn stats(&self) -> Result<RelayStats, RelayError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(RelayCommand::Stats { reply }).await?;
        reply_rx.await.map_err(|_| RelayError::ServiceUnavailable)
    }

    /// Resolves once every open transport has been told to close.
    pub async fn shutdown(&self) -> Result<(), RelayError> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(RelayCommand::Shutdown { reply }).await?;
        reply_rx.await.map_err(|_| RelayError::ServiceUnavailable)
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::ServiceUnavailable)
    }
}
