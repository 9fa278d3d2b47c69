//! Background sampling task
//!
//! One tokio task owns the [`TrafficMonitor`]. Timer ticks and commands are
//! handled in the same `select!` loop, so they never overlap and a reset
//! always lands between two ticks. Results go out on a `watch` channel
//! (latest snapshot) and a `broadcast` channel (usage notification).

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::traffic::monitor::{
    CleanupReport, ResetScope, TrafficMonitor, TrafficSnapshot, UsageSummary,
};

const COMMAND_QUEUE: usize = 16;
const USAGE_CHANNEL: usize = 32;

enum Command {
    Reset {
        scope: ResetScope,
        reply: oneshot::Sender<UsageSummary>,
    },
    Cleanup {
        reply: oneshot::Sender<CleanupReport>,
    },
}

/// Owning handle to the sampling task. Dropping it stops the task.
pub struct MonitorHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<TrafficSnapshot>,
    usage: broadcast::Sender<UsageSummary>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Prime the monitor and start ticking at its interval
    pub fn spawn(mut monitor: TrafficMonitor) -> Self {
        let initial = monitor.prime();
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (snapshot_tx, snapshots) = watch::channel(initial);
        let (usage, _) = broadcast::channel(USAGE_CHANNEL);

        let task = tokio::spawn(run(monitor, command_rx, snapshot_tx, usage.clone()));

        Self {
            commands,
            snapshots,
            usage,
            task,
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> TrafficSnapshot {
        *self.snapshots.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<TrafficSnapshot> {
        self.snapshots.clone()
    }

    /// `{today, monthly}` notifications, one per tick, reset and cleanup.
    ///
    /// This is the observer feed for consumers that want every update, not
    /// just the latest value; `netmeter watch` logs from it. A receiver that
    /// falls more than the channel capacity behind gets `Lagged` and resumes
    /// from the oldest retained notification.
    pub fn subscribe_usage(&self) -> broadcast::Receiver<UsageSummary> {
        self.usage.subscribe()
    }

    /// Queue a reset; resolves once it is persisted
    pub async fn reset(&self, scope: ResetScope) -> anyhow::Result<UsageSummary> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Reset { scope, reply })
            .await
            .map_err(|_| anyhow::anyhow!("traffic monitor task has stopped"))?;
        Ok(rx.await?)
    }

    pub async fn cleanup(&self) -> anyhow::Result<CleanupReport> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Cleanup { reply })
            .await
            .map_err(|_| anyhow::anyhow!("traffic monitor task has stopped"))?;
        Ok(rx.await?)
    }

    /// Stop ticking and wait for the task to finish its current step
    pub async fn shutdown(self) {
        let MonitorHandle { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!("traffic monitor task ended abnormally: {}", e);
        }
    }
}

async fn run(
    mut monitor: TrafficMonitor,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<TrafficSnapshot>,
    usage: broadcast::Sender<UsageSummary>,
) {
    let period = monitor.interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("traffic sampling every {:?}", period);

    loop {
        tokio::select! {
            // Commands first so a queued reset is never starved by ticks
            biased;

            command = commands.recv() => match command {
                Some(Command::Reset { scope, reply }) => {
                    let snapshot = monitor.reset(scope);
                    publish(&snapshots, &usage, snapshot);
                    let _ = reply.send(snapshot.usage);
                }
                Some(Command::Cleanup { reply }) => {
                    let report = monitor.cleanup();
                    publish(&snapshots, &usage, monitor.snapshot());
                    let _ = reply.send(report);
                }
                None => break,
            },

            _ = ticker.tick() => {
                let snapshot = monitor.tick();
                publish(&snapshots, &usage, snapshot);
            }
        }
    }

    debug!("traffic sampling stopped");
}

fn publish(
    snapshots: &watch::Sender<TrafficSnapshot>,
    usage: &broadcast::Sender<UsageSummary>,
    snapshot: TrafficSnapshot,
) {
    snapshots.send_replace(snapshot);
    // No subscribers is fine
    let _ = usage.send(snapshot.usage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::collector::tests::FakeSource;
    use crate::system::collector::CounterSampler;
    use crate::system::network::InterfaceClassifier;
    use crate::traffic::clock::tests::ManualClock;
    use crate::traffic::ledger::TrafficLedger;
    use crate::traffic::store::MemoryStore;
    use std::time::Duration;

    fn spawn_monitor(source: &FakeSource) -> MonitorHandle {
        let sampler = CounterSampler::new(Box::new(source.clone()), InterfaceClassifier::default());
        let monitor = TrafficMonitor::new(
            sampler,
            TrafficLedger::new(Box::new(MemoryStore::new())),
            Box::new(ManualClock::at(2026, 10, 19)),
            Duration::from_secs(1),
        );
        MonitorHandle::spawn(monitor)
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_primed_then_ticked_snapshots() {
        let source = FakeSource::with_counters(1000, 2000);
        let handle = spawn_monitor(&source);
        let mut rx = handle.watch();

        let primed = *rx.borrow_and_update();
        assert_eq!((primed.total_upload, primed.total_download), (1000, 2000));
        assert_eq!(primed.upload_speed, 0.0);

        source.set(1500, 2600);
        rx.changed().await.unwrap();
        let ticked = *rx.borrow_and_update();
        assert_eq!((ticked.total_upload, ticked.total_download), (1500, 2600));
        assert_eq!((ticked.upload_speed, ticked.download_speed), (500.0, 600.0));
        assert_eq!(ticked.usage.today, 4100.0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_applied_between_ticks() {
        let source = FakeSource::with_counters(1000, 2000);
        let handle = spawn_monitor(&source);
        let mut usage = handle.subscribe_usage();

        let summary = handle.reset(ResetScope::Today).await.unwrap();
        assert_eq!(summary.today, 0.0);
        assert_eq!(usage.recv().await.unwrap(), summary);

        let after_reset = handle.snapshot();
        assert_eq!((after_reset.total_upload, after_reset.total_download), (0, 0));

        source.set(1200, 2100);
        let mut rx = handle.watch();
        rx.borrow_and_update();
        rx.changed().await.unwrap();
        let s = *rx.borrow_and_update();
        assert_eq!((s.total_upload, s.total_download), (200, 100));
        assert_eq!(s.usage.monthly, 300.0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn usage_feed_follows_ticks_and_reports_lag() {
        let source = FakeSource::with_counters(0, 0);
        let handle = spawn_monitor(&source);
        let mut usage = handle.subscribe_usage();

        source.set(300, 700);
        let summary = usage.recv().await.unwrap();
        assert_eq!(summary.today, 1000.0);
        assert_eq!(summary, handle.snapshot().usage);

        // Stop reading for longer than the channel holds
        time::sleep(Duration::from_secs(USAGE_CHANNEL as u64 + 8)).await;
        assert!(matches!(
            usage.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert_eq!(usage.recv().await.unwrap().today, 1000.0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_command_reports() {
        let source = FakeSource::with_counters(0, 0);
        let handle = spawn_monitor(&source);
        let report = handle.cleanup().await.unwrap();
        assert_eq!(report, CleanupReport::default());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let source = FakeSource::with_counters(0, 0);
        let handle = spawn_monitor(&source);
        let mut rx = handle.watch();
        drop(handle);

        // The sender side of the watch goes away with the task
        while rx.changed().await.is_ok() {}
    }
}
