//! netmeter configuration persistence (htoprc-style key=value format)
//!
//! Lives at `<config dir>/netmeter/netmeterrc` (e.g. `~/.config/netmeter/netmeterrc`).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::color_scheme::ColorSchemeId;
use crate::system::network::{
    InterfaceClassifier, DEFAULT_CELLULAR_PREFIXES, DEFAULT_WIFI_PREFIXES,
};
use crate::traffic::monitor::DEFAULT_RETENTION_DAYS;

const APP_DIR: &str = "netmeter";

/// Default config file path: <config dir>/netmeter/netmeterrc
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("netmeterrc"))
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq)]
pub struct NetmeterConfig {
    // Sampling
    pub update_interval_ms: u64,
    pub retention_days: u32,

    // Interface selection (name prefixes)
    pub wifi_interfaces: Vec<String>,
    pub cellular_interfaces: Vec<String>,

    // Storage & logging
    pub store_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,

    // Color scheme
    pub color_scheme_id: ColorSchemeId,
}

impl Default for NetmeterConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            retention_days: DEFAULT_RETENTION_DAYS,
            wifi_interfaces: DEFAULT_WIFI_PREFIXES.iter().map(|s| s.to_string()).collect(),
            cellular_interfaces: DEFAULT_CELLULAR_PREFIXES.iter().map(|s| s.to_string()).collect(),
            store_path: data_dir().join("traffic.ledger"),
            log_level: "info".to_string(),
            log_dir: data_dir().join("logs"),
            color_scheme_id: ColorSchemeId::Default,
        }
    }
}

impl NetmeterConfig {
    /// Load config from `path`; unreadable files and unknown keys fall back to defaults
    pub fn load_from(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "update_interval_ms" => {
                        if let Ok(v) = value.parse::<u64>() {
                            cfg.update_interval_ms = v.clamp(200, 10_000);
                        }
                    }
                    "retention_days" => {
                        if let Ok(v) = value.parse::<u32>() {
                            cfg.retention_days = v.max(1);
                        }
                    }
                    "wifi_interfaces" => cfg.wifi_interfaces = split_list(value),
                    "cellular_interfaces" => cfg.cellular_interfaces = split_list(value),
                    "store_path" if !value.is_empty() => cfg.store_path = PathBuf::from(value),
                    "log_level" if !value.is_empty() => cfg.log_level = value.to_string(),
                    "log_dir" if !value.is_empty() => cfg.log_dir = PathBuf::from(value),
                    "color_scheme" => {
                        if let Ok(idx) = value.parse::<usize>() {
                            cfg.color_scheme_id = ColorSchemeId::from_index(idx);
                        }
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }

        cfg
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }

        let lines = [
            "# netmeter configuration file".to_string(),
            "# Auto-generated; edits are kept, comments are not".to_string(),
            String::new(),
            format!("update_interval_ms={}", self.update_interval_ms),
            format!("retention_days={}", self.retention_days),
            format!("wifi_interfaces={}", self.wifi_interfaces.join(",")),
            format!("cellular_interfaces={}", self.cellular_interfaces.join(",")),
            format!("store_path={}", self.store_path.display()),
            format!("log_level={}", self.log_level),
            format!("log_dir={}", self.log_dir.display()),
            format!("color_scheme={}", self.color_scheme_id as usize),
        ];

        let content = lines.join("\n") + "\n";
        let mut file = fs::File::create(path)
            .with_context(|| format!("Failed to create config file {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn classifier(&self) -> InterfaceClassifier {
        InterfaceClassifier::new(self.wifi_interfaces.clone(), self.cellular_interfaces.clone())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
