use tandem_core::ServerMessage;
use tokio::sync::mpsc;

/// Per-connection queue depth. Frames for a client that stops reading are
/// dropped once it fills.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Items queued for a connection's socket writer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// A JSON frame for the client.
    Signal(ServerMessage),
    /// Transport-level keepalive probe (WebSocket Ping).
    Probe,
    /// Close the transport after flushing what is queued.
    Close,
}

/// Write half of a connection as seen by the relay.
pub type TransportSender = mpsc::Sender<Outbound>;

/// Read half drained by the socket writer task.
pub type TransportReceiver = mpsc::Receiver<Outbound>;

pub fn outbound_channel() -> (TransportSender, TransportReceiver) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}
