use crate::registry::Connection;
use crate::transport::{Outbound, TransportSender};
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tandem_core::{ConnectionId, RoomId, ServerMessage};
use tracing::{debug, warn};

/// Owns every live connection and its transient state.
///
/// Keeping the room pointer consistent with [`crate::RoomManager`] is the
/// caller's job.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, transport: TransportSender) -> ConnectionId {
        let mut id = ConnectionId::new();
        while self.connections.contains_key(&id) {
            id = ConnectionId::new();
        }

        self.connections.insert(id, Connection::new(id, transport));
        debug!("Registered connection {}", id);
        id
    }

    /// Removes the entry. Returns it if it was present.
    pub fn deregister(&mut self, id: ConnectionId) -> Option<Connection> {
        self.connections.remove(&id)
    }

    pub fn lookup(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub(crate) fn lookup_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn set_room(&mut self, id: ConnectionId, room_id: Option<RoomId>) {
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.set_room(room_id);
        }
    }

    pub fn room_of(&self, id: ConnectionId) -> Option<&RoomId> {
        self.connections.get(&id).and_then(Connection::room_id)
    }

    /// Fire-and-forget delivery. A missing or closed transport, or a full
    /// queue, is logged and reported as `false`.
    pub fn send(&self, id: ConnectionId, msg: ServerMessage) -> bool {
        self.push(id, Outbound::Signal(msg))
    }

    pub(crate) fn push(&self, id: ConnectionId, item: Outbound) -> bool {
        let Some(conn) = self.connections.get(&id) else {
            warn!("Attempted to send to unknown connection {}", id);
            return false;
        };

        match conn.push(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue for connection {} is full, dropping", id);
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Transport for connection {} is closed", id);
                false
            }
        }
    }

    pub fn broadcast(&self, msg: &ServerMessage) {
        for conn in self.connections.values() {
            conn.send(msg.clone());
        }
    }

    pub fn ids(&self) -> Vec<ConnectionId> {
        self.connections.keys().copied().collect()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Connection> {
        self.connections.values_mut()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.connections.clear();
    }
}
