use crate::transport::{Outbound, TransportSender};
use chrono::{DateTime, Utc};
use tandem_core::{ConnectionId, RoomId, ServerMessage};
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;

/// The relay's view of one live transport session.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    transport: TransportSender,
    room_id: Option<RoomId>,
    connected_at: DateTime<Utc>,
    last_seen: Instant,
    missed_probes: u32,
    user_id: Option<String>,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, transport: TransportSender) -> Self {
        Self {
            id,
            transport,
            room_id: None,
            connected_at: Utc::now(),
            last_seen: Instant::now(),
            missed_probes: 0,
            user_id: None,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub fn missed_probes(&self) -> u32 {
        self.missed_probes
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// `false` once the socket writer has gone away.
    pub fn is_open(&self) -> bool {
        !self.transport.is_closed()
    }

    /// Queues a frame. Returns `false` if the transport is closed or its
    /// queue is full.
    pub fn send(&self, msg: ServerMessage) -> bool {
        self.push(Outbound::Signal(msg)).is_ok()
    }

    pub(crate) fn push(&self, item: Outbound) -> Result<(), TrySendError<Outbound>> {
        self.transport.try_send(item)
    }

    pub(crate) fn set_room(&mut self, room_id: Option<RoomId>) {
        self.room_id = room_id;
    }

    pub(crate) fn set_user_id(&mut self, user_id: Option<String>) {
        self.user_id = user_id;
    }

    pub(crate) fn mark_alive(&mut self) {
        self.last_seen = Instant::now();
        self.missed_probes = 0;
    }

    pub(crate) fn mark_probed(&mut self) {
        self.missed_probes = self.missed_probes.saturating_add(1);
    }
}
