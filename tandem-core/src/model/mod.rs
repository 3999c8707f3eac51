mod connection;
mod protocol_error;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use protocol_error::ProtocolError;
pub use room::{MAX_ROOM_ID_LEN, RoomId, RoomIdError};
pub use signaling::{ClientMessage, ServerMessage};
