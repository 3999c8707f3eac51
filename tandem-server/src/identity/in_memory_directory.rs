use crate::identity::{DirectoryError, User, UserDirectory, UserStatus};
use async_trait::async_trait;
use dashmap::DashMap;
use tandem_core::ConnectionId;

/// Process-local [`UserDirectory`] for deployments without a user service.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<String, User>,
    statuses: DashMap<String, UserStatus>,
    connections: DashMap<ConnectionId, String>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let directory = Self::new();
        for user in users {
            directory.insert(user);
        }
        directory
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn status(&self, user_id: &str) -> Option<UserStatus> {
        self.statuses.get(user_id).map(|s| *s)
    }

    pub fn user_for_connection(&self, connection_id: ConnectionId) -> Option<String> {
        self.connections.get(&connection_id).map(|u| u.clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve(&self, user_id: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn record_connection(
        &self,
        user_id: &str,
        connection_id: ConnectionId,
    ) -> Result<(), DirectoryError> {
        if !self.users.contains_key(user_id) {
            return Err(DirectoryError::UnknownUser(user_id.to_string()));
        }
        self.connections.insert(connection_id, user_id.to_string());
        Ok(())
    }

    async fn record_disconnection(
        &self,
        connection_id: ConnectionId,
    ) -> Result<(), DirectoryError> {
        self.connections.remove(&connection_id);
        Ok(())
    }

    async fn set_status(&self, user_id: &str, status: UserStatus) -> Result<(), DirectoryError> {
        if !self.users.contains_key(user_id) {
            return Err(DirectoryError::UnknownUser(user_id.to_string()));
        }
        self.statuses.insert(user_id.to_string(), status);
        Ok(())
    }
}
