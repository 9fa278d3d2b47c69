use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traffic::store::KeyValueStore;

pub const BASELINE_UPLOAD_KEY: &str = "baselineUpload";
pub const BASELINE_DOWNLOAD_KEY: &str = "baselineDownload";
pub const LAST_RESET_KEY: &str = "lastResetDate";
pub const DAILY_PREFIX: &str = "networkStats_";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw counter values subtracted from interface totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Baseline {
    pub upload: u64,
    pub download: u64,
}

/// Persisted per-day totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub upload: u64,
    pub download: u64,
    #[serde(with = "date_string")]
    pub date: NaiveDate,
}

impl DailyRecord {
    pub fn total(&self) -> u64 {
        self.upload.saturating_add(self.download)
    }
}

mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(super::DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(&s, super::DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn daily_key(date: NaiveDate) -> String {
    format!("{}{}", DAILY_PREFIX, format_date(date))
}

/// Typed view over the key-value store: baseline, last reset date, and the
/// per-day records.
///
/// Reads never fail (bad or missing values read as defaults). Writes are
/// best-effort: a failed write is logged and the in-memory state wins; the
/// next tick writes again.
pub struct TrafficLedger {
    store: Box<dyn KeyValueStore>,
}

impl TrafficLedger {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn baseline(&self) -> Baseline {
        Baseline {
            upload: self.read_u64(BASELINE_UPLOAD_KEY),
            download: self.read_u64(BASELINE_DOWNLOAD_KEY),
        }
    }

    pub fn save_baseline(&mut self, baseline: Baseline) {
        self.write(BASELINE_UPLOAD_KEY, baseline.upload.to_string());
        self.write(BASELINE_DOWNLOAD_KEY, baseline.download.to_string());
    }

    pub fn clear_baseline(&mut self) {
        self.delete(BASELINE_UPLOAD_KEY);
        self.delete(BASELINE_DOWNLOAD_KEY);
    }

    pub fn last_reset(&self) -> Option<NaiveDate> {
        self.store.get(LAST_RESET_KEY).and_then(|s| parse_date(&s))
    }

    pub fn save_last_reset(&mut self, date: NaiveDate) {
        self.write(LAST_RESET_KEY, format_date(date));
    }

    pub fn record(&self, date: NaiveDate) -> Option<DailyRecord> {
        let key = daily_key(date);
        let raw = self.store.get(&key)?;
        match serde_json::from_str::<DailyRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unreadable record {}: {}", key, e);
                None
            }
        }
    }

    pub fn upsert_record(&mut self, record: &DailyRecord) {
        let key = daily_key(record.date);
        match serde_json::to_string(record) {
            Ok(json) => self.write(&key, json),
            Err(e) => warn!("Failed to encode record {}: {}", key, e),
        }
    }

    pub fn remove_record(&mut self, date: NaiveDate) {
        self.delete(&daily_key(date));
    }

    /// Dates of every stored daily record, keyed by the date in the key name
    pub fn record_dates(&self) -> Vec<NaiveDate> {
        self.store
            .keys()
            .iter()
            .filter_map(|key| key.strip_prefix(DAILY_PREFIX))
            .filter_map(parse_date)
            .collect()
    }

    pub fn records(&self) -> Vec<DailyRecord> {
        self.record_dates()
            .into_iter()
            .filter_map(|date| self.record(date))
            .collect()
    }

    pub fn records_in_month(&self, year: i32, month: u32) -> Vec<DailyRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .collect()
    }

    fn read_u64(&self, key: &str) -> u64 {
        match self.store.get(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring non-numeric {}={}", key, raw);
                0
            }),
            None => 0,
        }
    }

    fn write(&mut self, key: &str, value: String) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Failed to delete {}: {}", key, e);
        }
    }
}
