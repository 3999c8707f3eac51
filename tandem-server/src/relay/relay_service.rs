use crate::identity::{AuthOutcome, IdentityBinder, UserDirectory};
use crate::liveness::LivenessMonitor;
use crate::relay::{MessageRouter, RelayCommand, RelayConfig, RelayHandle};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// The relay event loop.
///
/// Owns all room and connection state and processes one event at a time,
/// so none of it needs locking.
pub struct RelayService {
    router: MessageRouter,
    liveness: LivenessMonitor,
    command_rx: mpsc::Receiver<RelayCommand>,
    auth_rx: mpsc::UnboundedReceiver<AuthOutcome>,
    // keeps `auth_rx` open when no directory is configured
    _auth_tx: mpsc::UnboundedSender<AuthOutcome>,
}

impl RelayService {
    pub fn new(
        config: RelayConfig,
        directory: Option<Arc<dyn UserDirectory>>,
    ) -> (Self, RelayHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (auth_tx, auth_rx) = mpsc::unbounded_channel();

        let identity = directory.map(|d| IdentityBinder::new(d, auth_tx.clone()));

        let service = Self {
            router: MessageRouter::new(identity),
            liveness: config.liveness(),
            command_rx,
            auth_rx,
            _auth_tx: auth_tx,
        };

        (service, RelayHandle::new(command_tx))
    }

    /// Spawns the loop on the current runtime.
    pub fn spawn(
        config: RelayConfig,
        directory: Option<Arc<dyn UserDirectory>>,
    ) -> (RelayHandle, tokio::task::JoinHandle<()>) {
        let (service, handle) = Self::new(config, directory);
        (handle, tokio::spawn(service.run()))
    }

    pub async fn run(mut self) {
        info!(
            "Relay event loop started (probe every {:?}, max missed {:?})",
            self.liveness.interval(),
            self.liveness.max_missed_probes()
        );

        let period = self.liveness.interval().max(Duration::from_millis(1));
        let mut probes = tokio::time::interval_at(Instant::now() + period, period);
        probes.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if self.handle_command(c).is_break() {
                                break;
                            }
                        }
                        None => {
                            info!("All relay handles dropped. Shutting down relay.");
                            self.router.shutdown();
                            break;
                        }
                    }
                }

                Some(outcome) = self.auth_rx.recv() => {
                    self.router.complete_auth(outcome);
                }

                _ = probes.tick() => {
                    let expired = self.liveness.tick(self.router.registry_mut());
                    for id in expired {
                        self.router.evict(id);
                    }
                }
            }
        }

        info!("Relay event loop finished");
    }

    fn handle_command(&mut self, cmd: RelayCommand) -> ControlFlow<()> {
        match cmd {
            RelayCommand::Connect { transport, reply } => {
                let id = self.router.connect(transport);
                if reply.send(id).is_err() {
                    debug!("Transport for {} went away during accept", id);
                    self.router.disconnect(id);
                }
            }

            RelayCommand::Frame {
                connection_id,
                text,
            } => {
                self.liveness
                    .record_response(self.router.registry_mut(), connection_id);
                self.router.handle_frame(connection_id, &text);
            }

            RelayCommand::ProbeResponse { connection_id } => {
                self.liveness
                    .record_response(self.router.registry_mut(), connection_id);
            }

            RelayCommand::Disconnect { connection_id } => {
                self.router.disconnect(connection_id);
            }

            RelayCommand::Stats { reply } => {
                let _ = reply.send(self.router.stats());
            }

            RelayCommand::Shutdown { reply } => {
                self.router.shutdown();
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }
}
