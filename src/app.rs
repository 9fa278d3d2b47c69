use std::collections::VecDeque;

use crate::color_scheme::{ColorScheme, ColorSchemeId};
use crate::traffic::{CleanupReport, ResetScope, TrafficSnapshot};

/// Download/upload samples kept for the throughput bars' auto-scale
const SPEED_HISTORY: usize = 60;

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    ConfirmReset(ResetScope),
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,

    // Latest published traffic values
    pub snapshot: TrafficSnapshot,
    speed_history: VecDeque<f64>,

    // Footer status line ("Today's traffic reset", errors)
    pub status: Option<String>,

    // Color scheme
    pub color_scheme_id: ColorSchemeId,
    pub color_scheme: ColorScheme,
    /// Set when a setting changed and the rc file should be rewritten on quit
    pub config_dirty: bool,
}

impl App {
    pub fn new(snapshot: TrafficSnapshot, color_scheme_id: ColorSchemeId) -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,
            snapshot,
            speed_history: VecDeque::with_capacity(SPEED_HISTORY),
            status: None,
            color_scheme_id,
            color_scheme: ColorScheme::from_id(color_scheme_id),
            config_dirty: false,
        }
    }

    /// Take a newly published snapshot
    pub fn update(&mut self, snapshot: TrafficSnapshot) {
        if self.speed_history.len() == SPEED_HISTORY {
            self.speed_history.pop_front();
        }
        self.speed_history
            .push_back(snapshot.upload_speed.max(snapshot.download_speed).max(0.0));
        self.snapshot = snapshot;
    }

    /// Highest recent per-direction speed, used as the bar's full scale
    pub fn peak_speed(&self) -> f64 {
        self.speed_history.iter().copied().fold(0.0, f64::max)
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme_id = self.color_scheme_id.next();
        self.color_scheme = ColorScheme::from_id(self.color_scheme_id);
        self.config_dirty = true;
        self.status = Some(format!("Color scheme: {}", self.color_scheme_id.name()));
    }

    /// Record the outcome of a confirmed reset
    pub fn reset_done(&mut self, scope: ResetScope, snapshot: TrafficSnapshot) {
        self.snapshot = snapshot;
        self.status = Some(format!("Traffic for {} reset", scope.label()));
    }

    pub fn reset_failed(&mut self, err: &anyhow::Error) {
        self.status = Some(format!("Reset failed: {}", err));
    }

    pub fn cleanup_done(&mut self, report: CleanupReport) {
        let mut status = format!("Removed {} old daily record(s)", report.removed_records);
        if report.baseline_cleared {
            status.push_str(", cleared stale baseline");
        }
        self.status = Some(status);
    }
}
