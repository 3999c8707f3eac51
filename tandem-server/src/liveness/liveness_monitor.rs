use crate::registry::ConnectionRegistry;
use crate::transport::Outbound;
use std::time::Duration;
use tandem_core::ConnectionId;
use tracing::{debug, warn};

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic keepalive bookkeeping.
///
/// Without `max_missed_probes` the monitor only records diagnostics and never
/// evicts anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessMonitor {
    interval: Duration,
    max_missed_probes: Option<u32>,
}

impl Default for LivenessMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_INTERVAL, None)
    }
}

impl LivenessMonitor {
    pub fn new(interval: Duration, max_missed_probes: Option<u32>) -> Self {
        Self {
            interval,
            max_missed_probes,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_missed_probes(&self) -> Option<u32> {
        self.max_missed_probes
    }

    /// Sends one probe to every connection.
    ///
    /// Connections that already have `max_missed_probes` unanswered probes
    /// are returned instead of probed; the caller disconnects them.
    pub fn tick(&self, registry: &mut ConnectionRegistry) -> Vec<ConnectionId> {
        let mut expired = Vec::new();

        for conn in registry.iter_mut() {
            if let Some(max) = self.max_missed_probes {
                if conn.missed_probes() >= max {
                    warn!(
                        "Connection {} missed {} probes, evicting",
                        conn.id(),
                        conn.missed_probes()
                    );
                    expired.push(conn.id());
                    continue;
                }
            }

            if let Err(e) = conn.push(Outbound::Probe) {
                debug!("Probe to {} not queued: {}", conn.id(), e);
            }
            conn.mark_probed();
        }

        expired
    }

    /// Records any sign of life from `id`.
    pub fn record_response(&self, registry: &mut ConnectionRegistry, id: ConnectionId) {
        if let Some(conn) = registry.lookup_mut(id) {
            conn.mark_alive();
        }
    }
}
