use crate::identity::{AuthOutcome, IdentityBinder};
use crate::registry::ConnectionRegistry;
use crate::relay::RelayStats;
use crate::room::RoomManager;
use crate::transport::{Outbound, TransportSender};
use chrono::Utc;
use tandem_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};
use tracing::{debug, info, warn};

pub const SHUTDOWN_MESSAGE: &str = "Server is shutting down";

/// Dispatches inbound frames and keeps registry and rooms in step.
///
/// What a frame means depends only on the sender's room membership; there is
/// no per-connection state machine beyond that.
pub struct MessageRouter {
    registry: ConnectionRegistry,
    rooms: RoomManager,
    identity: Option<IdentityBinder>,
}

impl MessageRouter {
    pub fn new(identity: Option<IdentityBinder>) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            rooms: RoomManager::new(),
            identity,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ConnectionRegistry {
        &mut self.registry
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            connection_count: self.registry.len(),
            room_count: self.rooms.len(),
        }
    }

    pub fn connect(&mut self, transport: TransportSender) -> ConnectionId {
        let id = self.registry.register(transport);
        info!("New connection: {}", id);

        self.registry
            .send(id, ServerMessage::ConnectionEstablished { user_id: id });
        id
    }

    pub fn handle_frame(&mut self, id: ConnectionId, text: &str) {
        if !self.registry.contains(id) {
            debug!("Frame from unregistered connection {} ignored", id);
            return;
        }

        match ClientMessage::parse(text) {
            Ok(msg) => self.dispatch(id, msg),
            Err(e) => {
                warn!("Invalid frame from {}: {}", id, e);
                self.reply_error(id, e.to_string());
            }
        }
    }

    pub fn dispatch(&mut self, id: ConnectionId, msg: ClientMessage) {
        let kind = msg.kind();
        debug!("Routing {} from {}", kind, id);

        match msg {
            ClientMessage::JoinRoom { room_id } => {
                if let Err(e) = self.rooms.join(&mut self.registry, id, &room_id) {
                    warn!("Join of {} to '{}' rejected: {}", id, room_id, e);
                    self.reply_error(id, e.to_string());
                }
            }

            ClientMessage::LeaveRoom { room_id } => self.leave(id, room_id.as_deref()),

            ClientMessage::Offer { room_id, offer } => {
                let msg = ServerMessage::Offer {
                    offer,
                    from_user_id: id,
                };
                self.forward(id, kind, room_id.as_deref(), msg);
            }

            ClientMessage::Answer { room_id, answer } => {
                let msg = ServerMessage::Answer {
                    answer,
                    from_user_id: id,
                };
                self.forward(id, kind, room_id.as_deref(), msg);
            }

            ClientMessage::IceCandidate { room_id, candidate } => {
                let msg = ServerMessage::IceCandidate {
                    candidate,
                    from_user_id: id,
                };
                self.forward(id, kind, room_id.as_deref(), msg);
            }

            ClientMessage::Ping => {
                self.registry.send(
                    id,
                    ServerMessage::Pong {
                        timestamp: Utc::now().timestamp_millis(),
                    },
                );
            }

            ClientMessage::Auth { user_id } => self.authenticate(id, user_id),
        }
    }

    fn leave(&mut self, id: ConnectionId, raw_room_id: Option<&str>) {
        let room_id = match raw_room_id {
            Some(raw) => match RoomId::parse(raw) {
                Ok(room_id) => room_id,
                Err(_) => return,
            },
            None => match self.registry.room_of(id) {
                Some(room_id) => room_id.clone(),
                None => return,
            },
        };

        self.rooms.leave(&mut self.registry, id, &room_id);
    }

    /// Fire-and-forget delivery to the sender's peer. Absent or closed peers
    /// are normal during negotiation and never reported back.
    fn forward(
        &mut self,
        sender: ConnectionId,
        kind: &'static str,
        raw_room_id: Option<&str>,
        msg: ServerMessage,
    ) {
        let room_id = match raw_room_id.map(RoomId::parse) {
            Some(Ok(room_id)) => room_id,
            Some(Err(e)) => {
                warn!("Dropping {} from {}: {}", kind, sender, e);
                return;
            }
            None => match self.registry.room_of(sender) {
                Some(room_id) => room_id.clone(),
                None => {
                    warn!("Dropping {} from {}: not in a room", kind, sender);
                    return;
                }
            },
        };

        let Some(peer) = self.rooms.get_peer(sender, &room_id) else {
            if kind == "ice-candidate" {
                debug!("No peer for {} in {} yet, dropping candidate", sender, room_id);
            } else {
                warn!("No peer for {} in {}, dropping {}", sender, room_id, kind);
            }
            return;
        };

        match self.registry.lookup(peer) {
            Some(conn) if conn.is_open() => {
                if conn.send(msg) {
                    debug!("Forwarded {} from {} to {}", kind, sender, peer);
                } else {
                    warn!("Could not queue {} from {} to {}", kind, sender, peer);
                }
            }
            _ => warn!("Peer {} transport not open, dropping {}", peer, kind),
        }
    }

    fn authenticate(&mut self, id: ConnectionId, user_id: String) {
        let Some(identity) = &self.identity else {
            self.reply_error(id, "Authentication is not enabled");
            return;
        };

        debug!("Resolving identity '{}' for {}", user_id, id);
        identity.resolve(id, user_id.trim().to_string());
    }

    /// Applies a directory answer. The connection may have gone away while
    /// the lookup was in flight.
    pub fn complete_auth(&mut self, outcome: AuthOutcome) {
        let AuthOutcome {
            connection_id: id,
            user_id,
            result,
        } = outcome;

        let Some(conn) = self.registry.lookup_mut(id) else {
            debug!("Connection {} left before auth for '{}' completed", id, user_id);
            return;
        };

        match result {
            Ok(Some(user)) => {
                let previous = conn.user_id().map(str::to_string);
                conn.set_user_id(Some(user.id.clone()));
                info!("Connection {} authenticated as '{}'", id, user.id);

                if let Some(identity) = &self.identity {
                    match previous {
                        Some(previous) if previous == user.id => {}
                        Some(previous) => {
                            debug!("Connection {} switches from '{}'", id, previous);
                            identity.release(id, previous);
                            identity.bind(id, user.id.clone());
                        }
                        None => identity.bind(id, user.id.clone()),
                    }
                }
                self.registry.send(
                    id,
                    ServerMessage::AuthSuccess {
                        user_id: user.id,
                        display_name: user.display_name,
                    },
                );
            }
            Ok(None) => {
                warn!("Auth for {} failed: unknown user '{}'", id, user_id);
                self.reply_error(id, format!("Unknown user: {}", user_id));
            }
            Err(e) => {
                warn!("Auth for {} failed: {}", id, e);
                self.reply_error(id, format!("Authentication failed: {}", e));
            }
        }
    }

    /// The single cleanup path for a transport that closed or failed.
    ///
    /// Leaves the current room (the peer hears `user-left` once) and
    /// deregisters. Repeated calls are no-ops.
    pub fn disconnect(&mut self, id: ConnectionId) {
        let Some(conn) = self.registry.lookup(id) else {
            debug!("Disconnect for unknown connection {} ignored", id);
            return;
        };
        let room_id = conn.room_id().cloned();
        let user_id = conn.user_id().map(str::to_string);

        if let Some(room_id) = room_id {
            self.rooms.leave(&mut self.registry, id, &room_id);
        }
        self.registry.deregister(id);

        if let (Some(identity), Some(user_id)) = (&self.identity, user_id) {
            identity.release(id, user_id);
        }

        info!("Connection closed: {}", id);
    }

    /// Closes the transport, then runs the normal disconnect path.
    pub fn evict(&mut self, id: ConnectionId) {
        self.registry.push(id, Outbound::Close);
        self.disconnect(id);
    }

    /// Tells every client the server is going away and drops all state.
    pub fn shutdown(&mut self) {
        info!(
            "Shutting down relay with {} connections in {} rooms",
            self.registry.len(),
            self.rooms.len()
        );

        self.registry.broadcast(&ServerMessage::ServerShutdown {
            message: SHUTDOWN_MESSAGE.to_string(),
        });

        for id in self.registry.ids() {
            self.registry.push(id, Outbound::Close);

            let user_id = self
                .registry
                .lookup(id)
                .and_then(|c| c.user_id().map(str::to_string));
            if let (Some(identity), Some(user_id)) = (&self.identity, user_id) {
                identity.release(id, user_id);
            }
        }

        self.rooms.clear();
        self.registry.clear();
    }

    fn reply_error(&self, id: ConnectionId, message: impl Into<String>) {
        self.registry.send(id, ServerMessage::error(message));
    }
}
