use chrono::{DateTime, Utc};
use tandem_core::{ConnectionId, RoomId};

/// Maximum number of occupants of a room.
pub const ROOM_CAPACITY: usize = 2;

/// An in-memory pairing slot.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: Vec<ConnectionId>,
    created_at: DateTime<Utc>,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::with_capacity(ROOM_CAPACITY),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Occupants in join order.
    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    /// The other occupant, if `id` is a member and is not alone.
    pub fn peer_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        if !self.contains(id) {
            return None;
        }
        self.members.iter().copied().find(|&m| m != id)
    }

    pub(crate) fn add(&mut self, id: ConnectionId) -> bool {
        if self.is_full() || self.contains(id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub(crate) fn remove(&mut self, id: ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != id);
        self.members.len() != before
    }
}
