use crate::model::connection::ConnectionId;
use crate::model::protocol_error::ProtocolError;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames accepted from clients.
///
/// Negotiation payloads (`offer`, `answer`, `candidate`) are opaque to the
/// relay and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    JoinRoom {
        room_id: String,
    },
    LeaveRoom {
        #[serde(default)]
        room_id: Option<String>,
    },
    Offer {
        #[serde(default)]
        room_id: Option<String>,
        offer: Value,
    },
    Answer {
        #[serde(default)]
        room_id: Option<String>,
        answer: Value,
    },
    IceCandidate {
        #[serde(default)]
        room_id: Option<String>,
        candidate: Value,
    },
    Ping,
    Auth {
        user_id: String,
    },
}

impl ClientMessage {
    pub const KINDS: [&'static str; 7] = [
        "join-room",
        "leave-room",
        "offer",
        "answer",
        "ice-candidate",
        "ping",
        "auth",
    ];

    /// Parses one text frame.
    ///
    /// Unparsable JSON or a frame without a string `type` is `Malformed`; a
    /// type outside [`Self::KINDS`] is `UnknownType`; a known type missing a
    /// required field is `InvalidPayload`.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(|_| ProtocolError::Malformed)?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::Malformed)?
            .to_string();

        if !Self::KINDS.contains(&kind.as_str()) {
            return Err(ProtocolError::UnknownType(kind));
        }

        let message: Self =
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidPayload {
                kind: kind.clone(),
                reason: e.to_string(),
            })?;

        message.validate().map_err(|reason| ProtocolError::InvalidPayload {
            kind,
            reason: reason.to_string(),
        })?;

        Ok(message)
    }

    fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Offer { offer: payload, .. }
            | Self::Answer {
                answer: payload, ..
            }
            | Self::IceCandidate {
                candidate: payload, ..
            } if payload.is_null() => Err("payload must not be null"),
            Self::Auth { user_id } if user_id.trim().is_empty() => Err("userId is required"),
            _ => Ok(()),
        }
    }

    /// Wire name of this frame's type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join-room",
            Self::LeaveRoom { .. } => "leave-room",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::Ping => "ping",
            Self::Auth { .. } => "auth",
        }
    }
}

/// Frames sent to clients. Connection ids appear on the wire as `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    ConnectionEstablished {
        user_id: ConnectionId,
    },
    RoomJoined {
        room_id: RoomId,
        participant_count: usize,
    },
    RoomReady {
        room_id: RoomId,
        participant_count: usize,
    },
    UserJoined {
        user_id: ConnectionId,
        participant_count: usize,
    },
    UserLeft {
        user_id: ConnectionId,
        participant_count: usize,
    },
    Offer {
        offer: Value,
        from_user_id: ConnectionId,
    },
    Answer {
        answer: Value,
        from_user_id: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        from_user_id: ConnectionId,
    },
    Error {
        message: String,
    },
    Pong {
        timestamp: i64,
    },
    AuthSuccess {
        user_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    ServerShutdown {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
