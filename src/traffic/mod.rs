pub mod clock;
pub mod ledger;
pub mod monitor;
pub mod service;
pub mod store;

pub use monitor::{CleanupReport, ResetScope, TrafficMonitor, TrafficSnapshot, UsageSummary};
pub use service::MonitorHandle;
