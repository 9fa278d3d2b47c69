//! netmeter: Wi-Fi and cellular traffic meter for the terminal.
//!
//! Features:
//!   - Live upload/download throughput of the Wi-Fi and cellular interfaces
//!   - Totals since the last reset, kept across restarts
//!   - Per-day records with today / this month / daily average views
//!   - Reset of today's or this month's traffic
//!   - 30-day retention cleanup
//!
//! Keybindings: Press F1 or '?' for help.

mod app;
mod cli;
mod color_scheme;
mod config;
mod input;
mod logging;
mod system;
mod traffic;
mod tui;
mod ui;

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use cli::{CliArgs, Command};
use config::NetmeterConfig;
use system::collector::{CounterSampler, SysinfoCounterSource};
use traffic::clock::LocalClock;
use traffic::ledger::TrafficLedger;
use traffic::store::{FileStore, KeyValueStore, MemoryStore};
use traffic::{MonitorHandle, ResetScope, TrafficMonitor, TrafficSnapshot, UsageSummary};
use ui::format::{format_bytes, format_speed};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Load configuration, then let the command line override it
    let config_path = args.config.clone().or_else(config::config_path);
    let mut cfg = match &config_path {
        Some(path) => NetmeterConfig::load_from(path),
        None => NetmeterConfig::default(),
    };
    if let Some(store) = args.store {
        cfg.store_path = store;
    }
    if let Some(ms) = args.interval_ms {
        cfg.update_interval_ms = ms.clamp(200, 10_000);
    }
    if let Some(level) = args.log_level {
        cfg.log_level = level;
    }

    let command = args.command.unwrap_or(Command::Tui);

    // The TUI owns the terminal, so its log goes to a file
    let log_dir = match command {
        Command::Tui => match fs::create_dir_all(&cfg.log_dir) {
            Ok(()) => Some(cfg.log_dir.clone()),
            Err(e) => bail!("Failed to create log dir {}: {}", cfg.log_dir.display(), e),
        },
        _ => None,
    };
    let _guard = logging::init_tracing(log_dir.as_deref(), &cfg.log_level);

    match command {
        Command::Tui => {
            let handle = MonitorHandle::spawn(build_monitor(&cfg));
            let result = tui::run(&handle, &mut cfg, config_path.as_deref()).await;
            handle.shutdown().await;
            result
        }
        Command::Watch => run_watch(&cfg).await,
        Command::Stats => {
            let mut monitor = build_monitor(&cfg);
            print_snapshot(&monitor.prime());
            Ok(())
        }
        Command::Reset { scope } => {
            let scope = ResetScope::from(scope);
            let mut monitor = build_monitor(&cfg);
            monitor.prime();
            let snapshot = monitor.reset(scope);
            println!("Traffic for {} reset", scope.label());
            print_snapshot(&snapshot);
            Ok(())
        }
        Command::Cleanup => {
            let mut monitor = build_monitor(&cfg);
            let report = monitor.cleanup();
            println!(
                "Removed {} daily record(s) older than {} days{}",
                report.removed_records,
                cfg.retention_days,
                if report.baseline_cleared { ", cleared stale baseline" } else { "" }
            );
            Ok(())
        }
        Command::InitConfig { force } => {
            let path = config_path.context("Could not determine config path")?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            cfg.save_to(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Wire the monitor to the real interfaces, the ledger file and the local clock
fn build_monitor(cfg: &NetmeterConfig) -> TrafficMonitor {
    let store: Box<dyn KeyValueStore> = match FileStore::open(&cfg.store_path) {
        Ok(store) => {
            info!("traffic ledger at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            // Keep counting in memory; nothing will be persisted this run
            error!("could not open traffic ledger: {}; using in-memory store", e);
            Box::new(MemoryStore::new())
        }
    };

    let sampler = CounterSampler::new(Box::new(SysinfoCounterSource::new()), cfg.classifier());
    TrafficMonitor::new(
        sampler,
        TrafficLedger::new(store),
        Box::new(LocalClock),
        cfg.update_interval(),
    )
    .with_retention_days(cfg.retention_days)
}

/// Headless mode: sample in the foreground and log each usage notification until Ctrl+C
async fn run_watch(cfg: &NetmeterConfig) -> Result<()> {
    let handle = MonitorHandle::spawn(build_monitor(cfg));
    let mut usage = handle.subscribe_usage();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    log_snapshot(&handle.snapshot());
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Received shutdown signal");
                break;
            }
            received = usage.recv() => match received {
                Ok(summary) => log_usage(&handle.snapshot(), summary),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("watch output fell behind, skipped {} notification(s)", skipped);
                }
                Err(RecvError::Closed) => {
                    error!("traffic monitor task stopped");
                    break;
                }
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn log_snapshot(s: &TrafficSnapshot) {
    log_usage(s, s.usage);
}

/// Speeds and totals come from the snapshot; usage from the notification itself
fn log_usage(s: &TrafficSnapshot, usage: UsageSummary) {
    info!(
        up = %format_speed(s.upload_speed),
        down = %format_speed(s.download_speed),
        total_up = s.total_upload,
        total_down = s.total_download,
        today = %format_bytes(usage.today),
        month = %format_bytes(usage.monthly),
        "traffic"
    );
}

fn print_snapshot(s: &TrafficSnapshot) {
    println!("Date           {}", s.date.format("%Y-%m-%d"));
    println!(
        "Since reset    up {}  down {}",
        format_bytes(s.total_upload as f64),
        format_bytes(s.total_download as f64)
    );
    println!("Today          {}", format_bytes(s.usage.today));
    println!("This month     {}", format_bytes(s.usage.monthly));
    println!("Daily average  {}", format_bytes(s.usage.daily_average(s.date)));
}
