use tandem_core::{ConnectionId, RoomId, RoomIdError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error(transparent)]
    InvalidRoomId(#[from] RoomIdError),

    #[error("Room {0} is full")]
    RoomFull(RoomId),

    #[error("Unknown connection {0}")]
    UnknownConnection(ConnectionId),
}
