use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::{DEFAULT_ZONE, DailyLog, FxState, Goals, LogEntry, parse_zone};
use tracing::warn;

pub const KEY_LAST: &str = "last";
pub const KEY_LOG: &str = "log";
pub const KEY_TIMEZONE: &str = "timezone";
pub const KEY_FX: &str = "fx";
pub const KEY_GOALS: &str = "goals";

/// `$TALLY_HOME`, or `~/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TALLY_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// JSON key-value store at `<home>/store.json`.
///
/// Values are written back only on [`Store::save`].
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Store {
    pub fn open(home: &Path) -> Result<Self> {
        let path = home.join("store.json");
        let values = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            if s.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
            }
        } else {
            Map::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => {
                let parsed = serde_json::from_value(v.clone()).with_context(|| format!("decode store key `{key}`"))?;
                Ok(Some(parsed))
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let v = serde_json::to_value(value).with_context(|| format!("encode store key `{key}`"))?;
        self.values.insert(key.to_string(), v);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    /// Saved zone; unset or unknown zones fall back to the default.
    pub fn timezone(&self) -> Tz {
        let raw: Option<String> = self.get(KEY_TIMEZONE).unwrap_or_default();
        match raw {
            None => DEFAULT_ZONE,
            Some(name) => parse_zone(&name).unwrap_or_else(|err| {
                warn!(%err, "stored zone is invalid; using {}", DEFAULT_ZONE);
                DEFAULT_ZONE
            }),
        }
    }

    pub fn fx(&self) -> Result<FxState> {
        Ok(self.get(KEY_FX)?.unwrap_or_default())
    }

    pub fn goals(&self) -> Result<Goals> {
        Ok(self.get(KEY_GOALS)?.unwrap_or_default())
    }

    pub fn log(&self) -> Result<DailyLog> {
        Ok(self.get(KEY_LOG)?.unwrap_or_default())
    }

    pub fn last(&self) -> Result<Option<LogEntry>> {
        self.get(KEY_LAST)
    }

    /// Remember a finished scan: `last` plus an upsert into the log.
    pub fn record(&mut self, entry: &LogEntry) -> Result<()> {
        let mut log = self.log()?;
        log.upsert(entry.clone());
        self.set(KEY_LAST, entry)?;
        self.set(KEY_LOG, &log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn entry(day: u32, cents: i64) -> LogEntry {
        LogEntry {
            date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            total_usd: Decimal::new(cents, 2),
            approved_count: 1,
            awaiting_count: 0,
            counted_rows: 1,
            pages: 1,
            saved_at: Utc.with_ymd_and_hms(2026, 10, day, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_defaults_on_fresh_home() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.timezone(), DEFAULT_ZONE);
        assert_eq!(store.fx().unwrap(), FxState::default());
        assert_eq!(store.goals().unwrap(), Goals::default());
        assert!(store.log().unwrap().is_empty());
        assert!(store.last().unwrap().is_none());
    }

    #[test]
    fn test_record_persists_last_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        store.record(&entry(16, 500)).unwrap();
        store.record(&entry(17, 1300)).unwrap();
        store.record(&entry(17, 1450)).unwrap();
        store.save().unwrap();

        let reopened = Store::open(dir.path()).unwrap();
        let log = reopened.log().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(reopened.last().unwrap(), Some(entry(17, 1450)));

        let raw = fs::read_to_string(reopened.path()).unwrap();
        assert!(raw.contains("\"totalUSD\""));
    }

    #[test]
    fn test_invalid_stored_zone_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        store.set(KEY_TIMEZONE, &"Mars/Olympus").unwrap();
        assert_eq!(store.timezone(), DEFAULT_ZONE);
        store.set(KEY_TIMEZONE, &"Asia/Tokyo").unwrap();
        assert_eq!(store.timezone(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn test_remove_clears_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path()).unwrap();
        store.record(&entry(17, 100)).unwrap();
        store.remove(KEY_LOG);
        store.remove(KEY_LAST);
        assert!(store.log().unwrap().is_empty());
        assert!(store.last().unwrap().is_none());
    }
}
