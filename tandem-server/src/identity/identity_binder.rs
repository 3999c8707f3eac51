use crate::identity::{DirectoryError, User, UserDirectory, UserStatus};
use std::sync::Arc;
use tandem_core::ConnectionId;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result of an asynchronous `resolve`, delivered back to the relay task.
///
/// The connection may be gone by the time this arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub connection_id: ConnectionId,
    pub user_id: String,
    pub result: Result<Option<User>, DirectoryError>,
}

#[derive(Debug)]
enum PresenceUpdate {
    Bind {
        connection_id: ConnectionId,
        user_id: String,
    },
    Release {
        connection_id: ConnectionId,
        user_id: String,
    },
}

/// Associates connections with identities held by a [`UserDirectory`].
///
/// Never blocks the caller. Lookups run on their own tasks; presence
/// bookkeeping is applied by one worker in the order it was requested, so a
/// release never overtakes the bind before it.
#[derive(Clone)]
pub struct IdentityBinder {
    directory: Arc<dyn UserDirectory>,
    outcomes: mpsc::UnboundedSender<AuthOutcome>,
    presence: mpsc::UnboundedSender<PresenceUpdate>,
}

impl IdentityBinder {
    /// Spawns the presence worker, so this must be called inside a Tokio
    /// runtime. The worker stops once every clone of the binder is dropped.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        outcomes: mpsc::UnboundedSender<AuthOutcome>,
    ) -> Self {
        let (presence, updates) = mpsc::unbounded_channel();
        tokio::spawn(run_presence(directory.clone(), updates));

        Self {
            directory,
            outcomes,
            presence,
        }
    }

    pub fn resolve(&self, connection_id: ConnectionId, user_id: String) {
        let directory = self.directory.clone();
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let result = directory.resolve(&user_id).await;
            let outcome = AuthOutcome {
                connection_id,
                user_id,
                result,
            };
            if outcomes.send(outcome).is_err() {
                debug!("Relay stopped before auth for {} completed", connection_id);
            }
        });
    }

    pub fn bind(&self, connection_id: ConnectionId, user_id: String) {
        self.enqueue(PresenceUpdate::Bind {
            connection_id,
            user_id,
        });
    }

    pub fn release(&self, connection_id: ConnectionId, user_id: String) {
        self.enqueue(PresenceUpdate::Release {
            connection_id,
            user_id,
        });
    }

    fn enqueue(&self, update: PresenceUpdate) {
        if let Err(e) = self.presence.send(update) {
            warn!("Presence worker stopped, dropping {:?}", e.0);
        }
    }
}

async fn run_presence(
    directory: Arc<dyn UserDirectory>,
    mut updates: mpsc::UnboundedReceiver<PresenceUpdate>,
) {
    while let Some(update) = updates.recv().await {
        match update {
            PresenceUpdate::Bind {
                connection_id,
                user_id,
            } => {
                if let Err(e) = directory.record_connection(&user_id, connection_id).await {
                    warn!("Failed to record connection {} for {}: {}", connection_id, user_id, e);
                }
                if let Err(e) = directory.set_status(&user_id, UserStatus::Online).await {
                    warn!("Failed to mark {} online: {}", user_id, e);
                }
            }
            PresenceUpdate::Release {
                connection_id,
                user_id,
            } => {
                if let Err(e) = directory.record_disconnection(connection_id).await {
                    warn!("Failed to record disconnection of {}: {}", connection_id, e);
                }
                if let Err(e) = directory.set_status(&user_id, UserStatus::Offline).await {
                    warn!("Failed to mark {} offline: {}", user_id, e);
                }
            }
        }
    }

    debug!("Presence worker finished");
}
