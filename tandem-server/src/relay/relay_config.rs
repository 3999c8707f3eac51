use crate::liveness::{DEFAULT_PROBE_INTERVAL, LivenessMonitor};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// How often every connection is probed.
    pub probe_interval: Duration,
    /// Evict after this many unanswered probes. `None` never evicts.
    pub max_missed_probes: Option<u32>,
    /// Capacity of the command channel into the relay task.
    pub command_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            probe_interval: DEFAULT_PROBE_INTERVAL,
            max_missed_probes: None,
            command_buffer: 1024,
        }
    }
}

impl RelayConfig {
    pub fn liveness(&self) -> LivenessMonitor {
        LivenessMonitor::new(self.probe_interval, self.max_missed_probes)
    }
}
