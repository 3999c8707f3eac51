use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tandem_core::ConnectionId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    Offline,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),

    #[error("unknown user {0}")]
    UnknownUser(String),
}

/// Externally owned user store consulted by the `auth` flow.
///
/// Calls run off the relay task; implementations may block on I/O.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<Option<User>, DirectoryError>;

    async fn record_connection(
        &self,
        user_id: &str,
        connection_id: ConnectionId,
    ) -> Result<(), DirectoryError>;

    async fn record_disconnection(&self, connection_id: ConnectionId)
    -> Result<(), DirectoryError>;

    async fn set_status(&self, user_id: &str, status: UserStatus) -> Result<(), DirectoryError>;
}
