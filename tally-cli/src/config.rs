use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tally_finance::DEFAULT_FX_ENDPOINT;
use tally_ingest::{MAX_PAGES, PAGE_WAIT, POLL_INTERVAL};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceSection,
    pub scan: ScanSection,
    pub fx: FxSection,
}

/// Where pages come from when `sum` gets neither `--dir` nor `--url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Submissions listing; `?page=N` is set per page.
    pub url: Option<String>,
    /// Sent verbatim as the `Cookie` header.
    pub cookie: Option<String>,
    /// Directory of saved `page-N.html` files.
    pub pages_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    pub max_pages: u32,
    pub page_wait_ms: u64,
    pub poll_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
            page_wait_ms: PAGE_WAIT.as_millis() as u64,
            poll_ms: POLL_INTERVAL.as_millis() as u64,
            request_timeout_ms: 15_000,
        }
    }
}

impl ScanSection {
    pub fn page_wait(&self) -> Duration {
        Duration::from_millis(self.page_wait_ms.max(1))
    }

    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSection {
    pub endpoint: String,
}

impl Default for FxSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FX_ENDPOINT.to_string(),
        }
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(home: &Path) -> Result<()> {
    let p = config_path(home);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(home, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.scan.max_pages, 20);
        assert_eq!(cfg.scan.page_wait(), Duration::from_secs(20));
        assert_eq!(cfg.fx.endpoint, DEFAULT_FX_ENDPOINT);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            "[source]\npages_dir = \"/tmp/pages\"\n\n[scan]\nmax_pages = 5\n",
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.source.pages_dir, Some(PathBuf::from("/tmp/pages")));
        assert_eq!(cfg.scan.max_pages, 5);
        assert_eq!(cfg.scan.poll_ms, 250);
        assert_eq!(cfg.fx, FxSection::default());
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path()).unwrap();
        assert!(config_path(dir.path()).exists());
        assert_eq!(load_config(dir.path()).unwrap(), Config::default());
    }
}
