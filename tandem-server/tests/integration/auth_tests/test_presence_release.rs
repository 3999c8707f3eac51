use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{ConnectionId, ServerMessage};
use tandem_server::{
    DirectoryError, InMemoryUserDirectory, RelayConfig, User, UserDirectory, UserStatus,
};

use crate::integration::{create_test_relay_with, init_tracing};
use crate::utils::TestClient;

/// Records connections only after a delay, like a remote user service.
struct SlowDirectory {
    inner: InMemoryUserDirectory,
}

#[async_trait]
impl UserDirectory for SlowDirectory {
    async fn resolve(&self, user_id: &str) -> Result<Option<User>, DirectoryError> {
        self.inner.resolve(user_id).await
    }

    async fn record_connection(
        &self,
        user_id: &str,
        connection_id: ConnectionId,
    ) -> Result<(), DirectoryError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.inner.record_connection(user_id, connection_id).await
    }

    async fn record_disconnection(&self, connection_id: ConnectionId) -> Result<(), DirectoryError> {
        self.inner.record_disconnection(connection_id).await
    }

    async fn set_status(&self, user_id: &str, status: UserStatus) -> Result<(), DirectoryError> {
        self.inner.set_status(user_id, status).await
    }
}

fn slow_directory() -> Arc<SlowDirectory> {
    Arc::new(SlowDirectory {
        inner: InMemoryUserDirectory::with_users([
            User {
                id: "alice".into(),
                display_name: None,
            },
            User {
                id: "bob".into(),
                display_name: None,
            },
        ]),
    })
}

#[tokio::test]
async fn test_disconnect_right_after_auth_goes_offline() {
    init_tracing();

    let directory = slow_directory();
    let shared: Arc<dyn UserDirectory> = directory.clone();
    let (relay, _task) = create_test_relay_with(RelayConfig::default(), Some(shared));
    let mut x = TestClient::connect(&relay).await.unwrap();

    x.send(json!({"type": "auth", "userId": "alice"})).await.unwrap();
    assert!(matches!(
        x.recv().await.unwrap(),
        ServerMessage::AuthSuccess { .. }
    ));

    let x_id = x.id;
    x.disconnect().await.unwrap();
    relay.stats().await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(directory.inner.user_for_connection(x_id), None);
    assert_eq!(directory.inner.status("alice"), Some(UserStatus::Offline));
}

#[tokio::test]
async fn test_switching_identity_then_disconnecting_releases_both() {
    init_tracing();

    let directory = slow_directory();
    let shared: Arc<dyn UserDirectory> = directory.clone();
    let (relay, _task) = create_test_relay_with(RelayConfig::default(), Some(shared));
    let mut x = TestClient::connect(&relay).await.unwrap();

    for user in ["alice", "bob"] {
        x.send(json!({"type": "auth", "userId": user})).await.unwrap();
        assert_eq!(
            x.recv().await.unwrap(),
            ServerMessage::AuthSuccess {
                user_id: user.into(),
                display_name: None,
            }
        );
    }

    let x_id = x.id;
    x.disconnect().await.unwrap();
    relay.stats().await.unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(directory.inner.user_for_connection(x_id), None);
    assert_eq!(directory.inner.status("alice"), Some(UserStatus::Offline));
    assert_eq!(directory.inner.status("bob"), Some(UserStatus::Offline));
}
