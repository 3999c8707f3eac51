use crate::transport::TransportSender;
use serde::{Deserialize, Serialize};
use tandem_core::ConnectionId;
use tokio::sync::oneshot;

/// Events fed into the relay task by transports and the HTTP layer.
#[derive(Debug)]
pub enum RelayCommand {
    /// A transport was accepted; the relay replies with the new id.
    Connect {
        transport: TransportSender,
        reply: oneshot::Sender<ConnectionId>,
    },

    /// One inbound text frame.
    Frame {
        connection_id: ConnectionId,
        text: String,
    },

    /// The transport answered a keepalive probe.
    ProbeResponse { connection_id: ConnectionId },

    /// The transport closed or failed, for whatever reason.
    Disconnect { connection_id: ConnectionId },

    Stats { reply: oneshot::Sender<RelayStats> },

    /// Notify everyone, close every transport and stop the loop.
    Shutdown { reply: oneshot::Sender<()> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStats {
    pub connection_count: usize,
    pub room_count: usize,
}
