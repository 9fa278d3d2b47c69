/// Cumulative counters for a single interface, as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    /// Bytes sent since the interface came up
    pub transmitted: u64,
    /// Bytes received since the interface came up
    pub received: u64,
}

impl InterfaceCounters {
    pub fn new(name: impl Into<String>, transmitted: u64, received: u64) -> Self {
        Self {
            name: name.into(),
            transmitted,
            received,
        }
    }
}

/// Sum of the cumulative counters of every monitored interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounterSnapshot {
    pub upload: u64,
    pub download: u64,
    /// Number of interfaces that contributed to the sums
    pub interfaces: usize,
    /// Set when the interface list could not be enumerated
    pub unavailable: bool,
}

impl InterfaceCounterSnapshot {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

/// Interface categories the meter distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Wifi,
    Cellular,
    /// Loopback, VPN/tunnel, wired, virtual bridges...
    Other,
}

impl InterfaceKind {
    pub fn is_monitored(&self) -> bool {
        matches!(self, InterfaceKind::Wifi | InterfaceKind::Cellular)
    }
}

pub const DEFAULT_WIFI_PREFIXES: &[&str] = &["en0", "wl"];
pub const DEFAULT_CELLULAR_PREFIXES: &[&str] = &["pdp_ip", "rmnet", "wwan", "ccmni"];

/// Classifies interfaces by name prefix.
///
/// Only Wi-Fi and cellular data interfaces are counted. `en0` is Wi-Fi on
/// phones, `pdp_ip0` is cellular; Linux uses `wlan0`/`wlp2s0` and
/// `wwan0`/`rmnet0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceClassifier {
    wifi_prefixes: Vec<String>,
    cellular_prefixes: Vec<String>,
}

impl Default for InterfaceClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_WIFI_PREFIXES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_CELLULAR_PREFIXES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl InterfaceClassifier {
    pub fn new(wifi_prefixes: Vec<String>, cellular_prefixes: Vec<String>) -> Self {
        Self {
            wifi_prefixes,
            cellular_prefixes,
        }
    }

    pub fn classify(&self, name: &str) -> InterfaceKind {
        if self.wifi_prefixes.iter().any(|p| !p.is_empty() && name.starts_with(p.as_str())) {
            InterfaceKind::Wifi
        } else if self.cellular_prefixes.iter().any(|p| !p.is_empty() && name.starts_with(p.as_str())) {
            InterfaceKind::Cellular
        } else {
            InterfaceKind::Other
        }
    }

    /// Sum the counters of the monitored interfaces, skipping everything else
    pub fn summarize(&self, interfaces: &[InterfaceCounters]) -> InterfaceCounterSnapshot {
        let mut snapshot = InterfaceCounterSnapshot::default();
        for iface in interfaces {
            if !self.classify(&iface.name).is_monitored() {
                continue;
            }
            snapshot.upload = snapshot.upload.saturating_add(iface.transmitted);
            snapshot.download = snapshot.download.saturating_add(iface.received);
            snapshot.interfaces += 1;
        }
        snapshot
    }
}
