use anyhow::Result;
use sysinfo::Networks;
use tracing::{debug, warn};

use crate::system::network::{InterfaceClassifier, InterfaceCounterSnapshot, InterfaceCounters};

/// Anything that can list per-interface cumulative byte counters
pub trait CounterSource: Send {
    fn read(&mut self) -> Result<Vec<InterfaceCounters>>;
}

/// Interface counters via the `sysinfo` crate
pub struct SysinfoCounterSource {
    networks: Networks,
}

impl SysinfoCounterSource {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoCounterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoCounterSource {
    fn read(&mut self) -> Result<Vec<InterfaceCounters>> {
        // true = drop interfaces that went away since the last refresh
        self.networks.refresh(true);

        Ok(self
            .networks
            .iter()
            .map(|(name, data)| {
                InterfaceCounters::new(name.as_str(), data.total_transmitted(), data.total_received())
            })
            .collect())
    }
}

/// Reads the counter source and reduces it to the monitored interface set.
///
/// Best-effort: a failing source yields an unavailable (0, 0) snapshot so the
/// periodic timer never stops because of it.
pub struct CounterSampler {
    source: Box<dyn CounterSource>,
    classifier: InterfaceClassifier,
}

impl CounterSampler {
    pub fn new(source: Box<dyn CounterSource>, classifier: InterfaceClassifier) -> Self {
        Self { source, classifier }
    }

    pub fn sample(&mut self) -> InterfaceCounterSnapshot {
        match self.source.read() {
            Ok(interfaces) => {
                let snapshot = self.classifier.summarize(&interfaces);
                debug!(
                    upload = snapshot.upload,
                    download = snapshot.download,
                    interfaces = snapshot.interfaces,
                    "sampled interface counters"
                );
                snapshot
            }
            Err(e) => {
                warn!("Failed to enumerate network interfaces: {:#}", e);
                InterfaceCounterSnapshot::unavailable()
            }
        }
    }
}
