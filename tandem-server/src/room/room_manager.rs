use crate::registry::ConnectionRegistry;
use crate::room::{ROOM_CAPACITY, Room, RoomError};
use std::collections::HashMap;
use tandem_core::{ConnectionId, RoomId, ServerMessage};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room_id: RoomId,
    pub participant_count: usize,
}

/// Owns the active rooms and enforces [`ROOM_CAPACITY`].
///
/// Every mutating call also updates the connection's room pointer in the
/// [`ConnectionRegistry`] and sends the resulting notifications, so that
/// `connection.room_id == Some(r)` holds exactly when `r` lists the
/// connection as a member.
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `conn_id` into `raw_room_id`, leaving its previous room first.
    ///
    /// Nothing is mutated when the id is invalid or the room is full.
    /// Re-joining the current room only repeats the confirmation.
    pub fn join(
        &mut self,
        registry: &mut ConnectionRegistry,
        conn_id: ConnectionId,
        raw_room_id: &str,
    ) -> Result<JoinOutcome, RoomError> {
        let room_id = RoomId::parse(raw_room_id)?;

        let Some(conn) = registry.lookup(conn_id) else {
            return Err(RoomError::UnknownConnection(conn_id));
        };
        let previous = conn.room_id().cloned();

        if previous.as_ref() == Some(&room_id) {
            let participant_count = self.participant_count(&room_id);
            registry.send(
                conn_id,
                ServerMessage::RoomJoined {
                    room_id: room_id.clone(),
                    participant_count,
                },
            );
            return Ok(JoinOutcome {
                room_id,
                participant_count,
            });
        }

        if self.rooms.get(&room_id).is_some_and(Room::is_full) {
            return Err(RoomError::RoomFull(room_id));
        }

        if let Some(previous) = previous {
            self.leave(registry, conn_id, &previous);
        }

        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            Room::new(room_id.clone())
        });
        room.add(conn_id);

        let participant_count = room.len();
        let peer = room.peer_of(conn_id);

        registry.set_room(conn_id, Some(room_id.clone()));
        info!(
            "Connection {} joined room {} ({}/{})",
            conn_id, room_id, participant_count, ROOM_CAPACITY
        );

        registry.send(
            conn_id,
            ServerMessage::RoomJoined {
                room_id: room_id.clone(),
                participant_count,
            },
        );

        if participant_count == ROOM_CAPACITY {
            if let Some(peer) = peer {
                registry.send(
                    peer,
                    ServerMessage::UserJoined {
                        user_id: conn_id,
                        participant_count,
                    },
                );

                let ready = ServerMessage::RoomReady {
                    room_id: room_id.clone(),
                    participant_count,
                };
                registry.send(peer, ready.clone());
                registry.send(conn_id, ready);
            }
        }

        Ok(JoinOutcome {
            room_id,
            participant_count,
        })
    }

    /// Removes `conn_id` from `room_id`. Returns `false` (and does nothing)
    /// if it was not a member.
    pub fn leave(
        &mut self,
        registry: &mut ConnectionRegistry,
        conn_id: ConnectionId,
        room_id: &RoomId,
    ) -> bool {
        let Some(room) = self.rooms.get_mut(room_id) else {
            debug!("Leave for unknown room {} ignored", room_id);
            return false;
        };

        if !room.remove(conn_id) {
            debug!("Connection {} is not in room {}", conn_id, room_id);
            return false;
        }

        let remaining: Vec<ConnectionId> = room.members().to_vec();

        if registry.room_of(conn_id) == Some(room_id) {
            registry.set_room(conn_id, None);
        }
        info!("Connection {} left room {}", conn_id, room_id);

        if remaining.is_empty() {
            self.rooms.remove(room_id);
            info!("Room {} is empty, removing", room_id);
            return true;
        }

        let participant_count = remaining.len();
        for member in remaining {
            registry.send(
                member,
                ServerMessage::UserLeft {
                    user_id: conn_id,
                    participant_count,
                },
            );
        }

        true
    }

    /// The other occupant of `room_id`. Missing rooms and absent peers are
    /// normal while a pair is still forming.
    pub fn get_peer(&self, conn_id: ConnectionId, room_id: &RoomId) -> Option<ConnectionId> {
        self.rooms.get(room_id)?.peer_of(conn_id)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn participant_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map_or(0, Room::len)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.rooms.clear();
    }

    /// Checks the room/connection membership invariants.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self, registry: &ConnectionRegistry) {
        for (id, room) in &self.rooms {
            assert!(!room.is_empty(), "empty room {} still registered", id);
            assert!(room.len() <= ROOM_CAPACITY, "room {} over capacity", id);
            for member in room.members() {
                assert_eq!(
                    registry.room_of(*member),
                    Some(id),
                    "member {} of {} has a stale room pointer",
                    member,
                    id
                );
            }
        }
        for conn_id in registry.ids() {
            if let Some(room_id) = registry.room_of(conn_id) {
                let room = self.rooms.get(room_id);
                assert!(
                    room.is_some_and(|r| r.contains(conn_id)),
                    "connection {} points at {} but is not a member",
                    conn_id,
                    room_id
                );
            }
        }
    }
}
