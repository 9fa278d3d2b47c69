//! Traffic accumulator
//!
//! Turns raw interface counters into "bytes since the last reset", derives
//! throughput between ticks, keeps one persisted record per day and answers
//! today/month queries. It is a plain synchronous object: the caller decides
//! when ticks happen (see [`crate::traffic::service`]).
//!
//! ```text
//! raw counters ──► minus baseline (clamped at 0) ──► running totals ──► daily record
//!                                                        │
//!                                  delta / interval ◄────┘
//! ```

use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info};

use crate::system::collector::CounterSampler;
use crate::traffic::clock::Clock;
use crate::traffic::ledger::{Baseline, DailyRecord, TrafficLedger};

/// Records older than this many days are dropped by cleanup
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Baseline-adjusted byte counts since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub upload: u64,
    pub download: u64,
}

/// Throughput between the two most recent ticks, in bytes per second
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Speed {
    pub upload_bps: f64,
    pub download_bps: f64,
}

/// Aggregates sent to observers after every tick and reset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageSummary {
    pub today: f64,
    pub monthly: f64,
}

impl UsageSummary {
    /// Month total spread over the days elapsed so far
    pub fn daily_average(&self, date: NaiveDate) -> f64 {
        self.monthly / date.day().max(1) as f64
    }
}

/// Everything the presentation layer needs after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficSnapshot {
    pub date: NaiveDate,
    pub upload_speed: f64,
    pub download_speed: f64,
    pub total_upload: u64,
    pub total_download: u64,
    pub usage: UsageSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Today,
    Month,
}

impl ResetScope {
    pub fn label(&self) -> &'static str {
        match self {
            ResetScope::Today => "today",
            ResetScope::Month => "this month",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_records: usize,
    pub baseline_cleared: bool,
}

pub struct TrafficMonitor {
    sampler: CounterSampler,
    ledger: TrafficLedger,
    clock: Box<dyn Clock>,
    interval: Duration,
    retention_days: u32,

    baseline: Baseline,
    totals: RunningTotals,
    speed: Speed,
    /// Day of the last cleanup pass; a new day triggers another one
    last_cleanup: Option<NaiveDate>,
}

impl TrafficMonitor {
    pub fn new(
        sampler: CounterSampler,
        ledger: TrafficLedger,
        clock: Box<dyn Clock>,
        interval: Duration,
    ) -> Self {
        let baseline = ledger.baseline();
        debug!(
            baseline_upload = baseline.upload,
            baseline_download = baseline.download,
            "loaded baseline"
        );
        Self {
            sampler,
            ledger,
            clock,
            interval,
            retention_days: DEFAULT_RETENTION_DAYS,
            baseline,
            totals: RunningTotals::default(),
            speed: Speed::default(),
            last_cleanup: None,
        }
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    /// Startup read: runs cleanup, then rebuilds the running totals from the
    /// live counters minus the persisted baseline. No speed is derived.
    pub fn prime(&mut self) -> TrafficSnapshot {
        self.cleanup();
        let today = self.clock.today();
        let sample = self.sampler.sample();
        if !sample.unavailable {
            self.totals = self.adjust(sample.upload, sample.download);
            self.store_today(today);
        }
        self.speed = Speed::default();
        info!(
            total_upload = self.totals.upload,
            total_download = self.totals.download,
            "traffic monitor primed"
        );
        self.snapshot_for(today)
    }

    /// One sampling step
    pub fn tick(&mut self) -> TrafficSnapshot {
        let today = self.clock.today();
        if self.last_cleanup != Some(today) {
            self.cleanup();
        }

        let prev = self.totals;
        let sample = self.sampler.sample();
        if sample.unavailable {
            // Zero-delta tick: keep the totals, report no traffic
            self.speed = Speed::default();
            return self.snapshot_for(today);
        }

        let current = self.adjust(sample.upload, sample.download);

        // A platform counter that went backwards shows up as a negative speed
        // for one tick; it is reported as measured.
        let secs = self.interval_secs();
        self.speed = Speed {
            upload_bps: (current.upload as f64 - prev.upload as f64) / secs,
            download_bps: (current.download as f64 - prev.download as f64) / secs,
        };
        self.totals = current;
        self.store_today(today);

        self.snapshot_for(today)
    }

    /// Forget today's (or this month's) records and re-anchor the baseline at
    /// the current live counters. The running totals are shared by both
    /// scopes, so both re-anchor.
    pub fn reset(&mut self, scope: ResetScope) -> TrafficSnapshot {
        let today = self.clock.today();

        match scope {
            ResetScope::Today => self.ledger.remove_record(today),
            ResetScope::Month => {
                for date in self.ledger.record_dates() {
                    if date.year() == today.year() && date.month() == today.month() {
                        self.ledger.remove_record(date);
                    }
                }
            }
        }

        self.baseline = Baseline {
            upload: self.baseline.upload.saturating_add(self.totals.upload),
            download: self.baseline.download.saturating_add(self.totals.download),
        };
        self.ledger.save_baseline(self.baseline);
        self.ledger.save_last_reset(today);

        self.totals = RunningTotals::default();
        self.speed = Speed::default();

        info!(
            scope = scope.label(),
            baseline_upload = self.baseline.upload,
            baseline_download = self.baseline.download,
            "traffic statistics reset"
        );
        self.snapshot_for(today)
    }

    /// Best-effort rotation: drop records past the retention window and
    /// forget a baseline whose last reset is older than that window.
    pub fn cleanup(&mut self) -> CleanupReport {
        let today = self.clock.today();
        self.last_cleanup = Some(today);

        let mut report = CleanupReport::default();
        let Some(cutoff) = today.checked_sub_days(Days::new(self.retention_days as u64)) else {
            return report;
        };

        // A day-stamped record or reset counts from its midnight, so the
        // cutoff day itself is already past the window
        for date in self.ledger.record_dates() {
            if date <= cutoff {
                self.ledger.remove_record(date);
                report.removed_records += 1;
            }
        }

        if self.ledger.last_reset().is_some_and(|last| last <= cutoff)
            && self.baseline != Baseline::default()
        {
            self.ledger.clear_baseline();
            self.baseline = Baseline::default();
            report.baseline_cleared = true;
        }

        if report != CleanupReport::default() {
            info!(
                removed = report.removed_records,
                baseline_cleared = report.baseline_cleared,
                "cleaned up stale traffic data"
            );
        }
        report
    }

    /// Upload + download recorded for today, 0 without a record
    pub fn today(&self) -> u64 {
        self.ledger
            .record(self.clock.today())
            .map(|r| r.total())
            .unwrap_or(0)
    }

    /// Upload + download of every record in the current calendar month
    pub fn month(&self) -> u64 {
        let today = self.clock.today();
        self.ledger
            .records_in_month(today.year(), today.month())
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.total()))
    }

    pub fn usage(&self) -> UsageSummary {
        UsageSummary {
            today: self.today() as f64,
            monthly: self.month() as f64,
        }
    }

    pub fn snapshot(&self) -> TrafficSnapshot {
        self.snapshot_for(self.clock.today())
    }

    #[cfg(test)]
    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    #[cfg(test)]
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    #[cfg(test)]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &TrafficLedger {
        &self.ledger
    }

    fn adjust(&self, raw_upload: u64, raw_download: u64) -> RunningTotals {
        RunningTotals {
            upload: raw_upload.saturating_sub(self.baseline.upload),
            download: raw_download.saturating_sub(self.baseline.download),
        }
    }

    fn store_today(&mut self, today: NaiveDate) {
        self.ledger.upsert_record(&DailyRecord {
            upload: self.totals.upload,
            download: self.totals.download,
            date: today,
        });
    }

    fn interval_secs(&self) -> f64 {
        let secs = self.interval.as_secs_f64();
        if secs > 0.0 {
            secs
        } else {
            1.0
        }
    }

    fn snapshot_for(&self, date: NaiveDate) -> TrafficSnapshot {
        TrafficSnapshot {
            date,
            upload_speed: self.speed.upload_bps,
            download_speed: self.speed.download_bps,
            total_upload: self.totals.upload,
            total_download: self.totals.download,
            usage: self.usage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::collector::tests::FakeSource;
    use crate::system::network::InterfaceClassifier;
    use crate::traffic::clock::tests::ManualClock;
    use crate::traffic::store::{FileStore, KeyValueStore, MemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monitor_with(
        source: &FakeSource,
        clock: &ManualClock,
        store: Box<dyn KeyValueStore>,
    ) -> TrafficMonitor {
        let sampler = CounterSampler::new(Box::new(source.clone()), InterfaceClassifier::default());
        TrafficMonitor::new(
            sampler,
            TrafficLedger::new(store),
            Box::new(clock.clone()),
            Duration::from_secs(1),
        )
    }

    fn monitor(source: &FakeSource, clock: &ManualClock) -> TrafficMonitor {
        monitor_with(source, clock, Box::new(MemoryStore::new()))
    }

    fn seeded_store(records: &[(NaiveDate, u64, u64)]) -> MemoryStore {
        let mut ledger_store = MemoryStore::new();
        for (d, up, down) in records {
            let json = serde_json::to_string(&DailyRecord {
                upload: *up,
                download: *down,
                date: *d,
            })
            .unwrap();
            ledger_store.set(&crate::traffic::ledger::daily_key(*d), json).unwrap();
        }
        ledger_store
    }

    #[test]
    fn tick_reset_tick_scenario() {
        let source = FakeSource::with_counters(1000, 2000);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);

        let s = m.tick();
        assert_eq!((s.total_upload, s.total_download), (1000, 2000));
        assert_eq!((s.upload_speed, s.download_speed), (1000.0, 2000.0));

        source.set(1500, 2500);
        let s = m.tick();
        assert_eq!((s.total_upload, s.total_download), (1500, 2500));
        assert_eq!((s.upload_speed, s.download_speed), (500.0, 500.0));

        let s = m.reset(ResetScope::Today);
        assert_eq!(m.baseline(), Baseline { upload: 1500, download: 2500 });
        assert_eq!((s.total_upload, s.total_download), (0, 0));

        source.set(1700, 2600);
        let s = m.tick();
        assert_eq!((s.total_upload, s.total_download), (200, 100));
        assert_eq!((s.upload_speed, s.download_speed), (200.0, 100.0));
    }

    #[test]
    fn totals_never_decrease_with_growing_counters() {
        let source = FakeSource::with_counters(0, 0);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);

        let mut last = RunningTotals::default();
        let (mut up, mut down) = (0u64, 0u64);
        for step in 0..50u64 {
            up += step * 37 % 11;
            down += step * 101 % 17;
            source.set(up, down);
            m.tick();
            let now = m.totals();
            assert!(now.upload >= last.upload && now.download >= last.download);
            assert!(m.speed().upload_bps >= 0.0 && m.speed().download_bps >= 0.0);
            last = now;
        }
    }

    #[test]
    fn reset_then_same_counters_reports_nothing() {
        let source = FakeSource::with_counters(4096, 8192);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();

        m.reset(ResetScope::Today);
        let s = m.tick();
        assert_eq!(s.upload_speed, 0.0);
        assert_eq!(s.download_speed, 0.0);
        assert_eq!(s.total_upload, 0);
        assert_eq!(s.total_download, 0);
    }

    #[test]
    fn reset_twice_folds_nothing_the_second_time() {
        let source = FakeSource::with_counters(300, 700);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();

        m.reset(ResetScope::Today);
        let once = m.baseline();
        m.reset(ResetScope::Today);
        assert_eq!(m.baseline(), once);
        assert_eq!(m.ledger().baseline(), once);
        assert_eq!(m.totals(), RunningTotals::default());
    }

    #[test]
    fn reset_persists_baseline_and_reset_date() {
        let source = FakeSource::with_counters(10, 20);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();
        assert!(m.ledger().record(date(2026, 10, 19)).is_some());

        m.reset(ResetScope::Today);
        assert_eq!(m.ledger().baseline(), Baseline { upload: 10, download: 20 });
        assert_eq!(m.ledger().last_reset(), Some(date(2026, 10, 19)));
        assert!(m.ledger().record(date(2026, 10, 19)).is_none());
        assert_eq!(m.today(), 0);
    }

    #[test]
    fn today_reads_only_todays_record() {
        let store = seeded_store(&[(date(2026, 10, 18), 500, 500), (date(2026, 10, 19), 3, 4)]);
        let source = FakeSource::with_counters(0, 0);
        let clock = ManualClock::at(2026, 10, 19);
        let m = monitor_with(&source, &clock, Box::new(store));
        assert_eq!(m.today(), 7);

        clock.set(date(2026, 10, 20));
        assert_eq!(m.today(), 0);
    }

    #[test]
    fn month_ignores_other_months_and_years() {
        let store = seeded_store(&[
            (date(2026, 10, 1), 100, 200),
            (date(2026, 10, 19), 10, 20),
            (date(2026, 9, 30), 9_999, 9_999),
            (date(2025, 10, 19), 7_777, 7_777),
        ]);
        let source = FakeSource::with_counters(0, 0);
        let clock = ManualClock::at(2026, 10, 19);
        let m = monitor_with(&source, &clock, Box::new(store));

        assert_eq!(m.month(), 330);
        let usage = m.usage();
        assert_eq!(usage.today, 30.0);
        assert_eq!(usage.monthly, 330.0);
    }

    #[test]
    fn month_reset_keeps_other_months() {
        let store = seeded_store(&[
            (date(2026, 10, 1), 100, 200),
            (date(2026, 10, 18), 1, 1),
            (date(2026, 9, 30), 5, 5),
        ]);
        let source = FakeSource::with_counters(50, 60);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor_with(&source, &clock, Box::new(store));
        m.tick();

        let s = m.reset(ResetScope::Month);
        assert_eq!(s.usage.monthly, 0.0);
        assert_eq!(m.month(), 0);
        assert_eq!(m.ledger().record_dates(), vec![date(2026, 9, 30)]);
        assert_eq!(m.baseline(), Baseline { upload: 50, download: 60 });
    }

    #[test]
    fn cleanup_drops_records_past_retention() {
        let today = date(2026, 10, 19);
        let store = seeded_store(&[
            (today - Days::new(31), 1, 1),
            (today - Days::new(30), 1, 1),
            (today - Days::new(29), 1, 1),
            (today, 1, 1),
        ]);
        let source = FakeSource::with_counters(0, 0);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor_with(&source, &clock, Box::new(store));

        let report = m.cleanup();
        assert_eq!(report.removed_records, 2);
        let dates = m.ledger().record_dates();
        assert!(!dates.contains(&(today - Days::new(31))));
        assert!(!dates.contains(&(today - Days::new(30))));
        assert!(dates.contains(&(today - Days::new(29))));
        assert!(dates.contains(&today));
    }

    #[test]
    fn cleanup_forgets_baseline_after_old_reset() {
        let source = FakeSource::with_counters(1000, 1000);
        let clock = ManualClock::at(2026, 8, 1);
        let mut m = monitor(&source, &clock);
        m.tick();
        m.reset(ResetScope::Today);
        assert_eq!(m.baseline(), Baseline { upload: 1000, download: 1000 });

        clock.set(date(2026, 9, 15));
        let report = m.cleanup();
        assert!(report.baseline_cleared);
        assert_eq!(m.baseline(), Baseline::default());
        assert_eq!(m.ledger().baseline(), Baseline::default());
    }

    #[test]
    fn reset_exactly_at_retention_edge_is_stale() {
        let source = FakeSource::with_counters(1000, 1000);
        let clock = ManualClock::at(2026, 9, 19);
        let mut m = monitor(&source, &clock);
        m.tick();
        m.reset(ResetScope::Today);
        m.tick();

        clock.set(date(2026, 10, 19));
        let report = m.cleanup();
        assert!(report.baseline_cleared);
        assert_eq!(report.removed_records, 1);
        assert_eq!(m.baseline(), Baseline::default());
        assert!(m.ledger().record_dates().is_empty());
    }

    #[test]
    fn recent_reset_keeps_baseline() {
        let source = FakeSource::with_counters(1000, 1000);
        let clock = ManualClock::at(2026, 10, 1);
        let mut m = monitor(&source, &clock);
        m.tick();
        m.reset(ResetScope::Today);

        clock.set(date(2026, 10, 19));
        assert!(!m.cleanup().baseline_cleared);
        assert_eq!(m.baseline(), Baseline { upload: 1000, download: 1000 });
    }

    #[test]
    fn unavailable_interfaces_hold_totals() {
        let source = FakeSource::with_counters(100, 200);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();

        source.fail();
        let s = m.tick();
        assert_eq!((s.total_upload, s.total_download), (100, 200));
        assert_eq!((s.upload_speed, s.download_speed), (0.0, 0.0));

        source.set(150, 260);
        let s = m.tick();
        assert_eq!((s.upload_speed, s.download_speed), (50.0, 60.0));
    }

    #[test]
    fn counters_below_baseline_clamp_to_zero() {
        let source = FakeSource::with_counters(5000, 5000);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();
        m.reset(ResetScope::Today);
        source.set(5400, 5100);
        m.tick();

        // Interface restarted: raw counters now far below the baseline
        source.set(10, 10);
        let s = m.tick();
        assert_eq!((s.total_upload, s.total_download), (0, 0));
        assert_eq!(s.upload_speed, -400.0);
        assert_eq!(s.download_speed, -100.0);
    }

    #[test]
    fn speed_is_per_second_of_interval() {
        let source = FakeSource::with_counters(0, 0);
        let clock = ManualClock::at(2026, 10, 19);
        let sampler = CounterSampler::new(Box::new(source.clone()), InterfaceClassifier::default());
        let mut m = TrafficMonitor::new(
            sampler,
            TrafficLedger::new(Box::new(MemoryStore::new())),
            Box::new(clock),
            Duration::from_millis(500),
        );
        m.tick();
        source.set(1000, 500);
        let s = m.tick();
        assert_eq!((s.upload_speed, s.download_speed), (2000.0, 1000.0));
    }

    #[test]
    fn new_day_starts_a_new_record() {
        let source = FakeSource::with_counters(100, 100);
        let clock = ManualClock::at(2026, 10, 19);
        let mut m = monitor(&source, &clock);
        m.tick();

        clock.set(date(2026, 10, 20));
        source.set(150, 120);
        m.tick();

        assert_eq!(m.ledger().record(date(2026, 10, 19)).unwrap().total(), 200);
        assert_eq!(m.ledger().record(date(2026, 10, 20)).unwrap().total(), 270);
    }

    #[test]
    fn restart_rebuilds_totals_from_persisted_baseline() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ledger");
        let source = FakeSource::with_counters(1500, 2500);
        let clock = ManualClock::at(2026, 10, 19);

        {
            let mut m = monitor_with(&source, &clock, Box::new(FileStore::open(&path).unwrap()));
            m.tick();
            m.reset(ResetScope::Today);
        }

        source.set(1700, 2600);
        let mut m = monitor_with(&source, &clock, Box::new(FileStore::open(&path).unwrap()));
        let s = m.prime();
        assert_eq!((s.total_upload, s.total_download), (200, 100));
        assert_eq!((s.upload_speed, s.download_speed), (0.0, 0.0));
        assert_eq!(m.today(), 300);
    }

    #[test]
    fn daily_average_divides_by_day_of_month() {
        let usage = UsageSummary { today: 0.0, monthly: 1900.0 };
        assert_eq!(usage.daily_average(date(2026, 10, 19)), 100.0);
    }
}
