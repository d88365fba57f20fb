use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tally_core::{LogEntry, zoned_date};
use tally_ingest::{
    Admission, DirSurface, HttpSurface, RenderSurface, ScanContext, ScanOutcome, Scanner,
};
use tracing::warn;

use crate::config::{Config, config_path};
use crate::fx_cmd::{refresh_if_stale, warn_if_unusable};
use crate::goals_cmd::progress;
use crate::render::{entry_summary, goals_summary};
use crate::state::Store;

#[derive(clap::Args, Debug)]
pub struct SumArgs {
    /// Directory of saved pages named page-1.html, page-2.html, ...
    #[arg(long, conflicts_with = "url")]
    pub dir: Option<PathBuf>,

    /// Submissions listing URL; `?page=N` is set per page
    #[arg(long)]
    pub url: Option<String>,

    /// Page ceiling for this run
    #[arg(long)]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Dir(PathBuf),
    Url(String),
}

/// Flags win over the `[source]` config section; a directory wins over a URL.
pub fn pick_source(args: &SumArgs, cfg: &Config) -> Option<Source> {
    if let Some(dir) = &args.dir {
        return Some(Source::Dir(dir.clone()));
    }
    if let Some(url) = &args.url {
        return Some(Source::Url(url.clone()));
    }
    if let Some(dir) = &cfg.source.pages_dir {
        return Some(Source::Dir(dir.clone()));
    }
    cfg.source.url.clone().map(Source::Url)
}

pub async fn run(args: SumArgs, store: &mut Store, cfg: &Config, home: &Path) -> Result<()> {
    let Some(source) = pick_source(&args, cfg) else {
        bail!(
            "no page source: pass --dir or --url, or set [source] in {}",
            config_path(home).display()
        );
    };

    let now = Utc::now();
    let zone = store.timezone();
    let fx = refresh_if_stale(store, cfg, zoned_date(now, zone)).await?;
    warn_if_unusable(&fx);

    let ctx = ScanContext::new(zone, fx.clone(), now)
        .with_max_pages(args.max_pages.unwrap_or(cfg.scan.max_pages))
        .with_timing(cfg.scan.page_wait(), cfg.scan.poll());

    let mut surface: Box<dyn RenderSurface> = match source {
        Source::Dir(dir) => {
            if !dir.is_dir() {
                bail!("not a directory: {}", dir.display());
            }
            Box::new(DirSurface::new(dir))
        }
        Source::Url(url) => Box::new(
            HttpSurface::new(&url, cfg.source.cookie.clone(), cfg.scan.request_timeout())
                .with_context(|| format!("bad source URL {url}"))?,
        ),
    };

    let scanner = Scanner::new();
    let scan = scanner.extract_today_total(surface.as_mut(), &ctx, Admission::Reject);
    tokio::pin!(scan);
    let outcome = loop {
        tokio::select! {
            out = &mut scan => break out?,
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupt received; stopping after the current page");
                scanner.cancel();
            }
        }
    };

    match outcome {
        ScanOutcome::NoData => {
            println!("No submissions found on page 1; nothing saved.");
        }
        ScanOutcome::Total(agg) => {
            let entry = LogEntry::from_aggregate(&agg, Utc::now());
            store.record(&entry)?;
            store.save()?;

            println!("{}", entry_summary(&entry, &fx, zone));
            let (daily, weekly) = progress(store, now)?;
            println!("{}", goals_summary(&daily, &weekly));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use tally_core::FxState;

    fn args(dir: Option<&str>, url: Option<&str>) -> SumArgs {
        SumArgs {
            dir: dir.map(PathBuf::from),
            url: url.map(str::to_string),
            max_pages: None,
        }
    }

    #[test]
    fn test_pick_source_precedence() {
        let mut cfg = Config::default();
        assert_eq!(pick_source(&args(None, None), &cfg), None);

        cfg.source.url = Some("https://example.test/submissions".into());
        assert_eq!(
            pick_source(&args(None, None), &cfg),
            Some(Source::Url("https://example.test/submissions".into()))
        );

        cfg.source.pages_dir = Some(PathBuf::from("/saved"));
        assert_eq!(pick_source(&args(None, None), &cfg), Some(Source::Dir("/saved".into())));
        assert_eq!(
            pick_source(&args(None, Some("https://x.test")), &cfg),
            Some(Source::Url("https://x.test".into()))
        );
        assert_eq!(pick_source(&args(Some("/here"), None), &cfg), Some(Source::Dir("/here".into())));
    }

    #[tokio::test]
    async fn test_sum_from_saved_pages_records_today() {
        let home = tempfile::tempdir().unwrap();
        let pages = tempfile::tempdir().unwrap();
        fs::write(
            pages.path().join("page-1.html"),
            r#"<section class="submissions-table"><div role="row">
                 <div class="cell study-date-cell">Today</div>
                 <div class="cell study-status-cell">Approved</div>
                 <div class="cell study-reward-cell">£10.00</div>
               </div></section>"#,
        )
        .unwrap();

        let mut store = Store::open(home.path()).unwrap();
        store.set(crate::state::KEY_FX, &FxState::manual(1.3).unwrap()).unwrap();
        let mut cfg = Config::default();
        cfg.scan.page_wait_ms = 200;
        cfg.scan.poll_ms = 10;

        let sum_args = SumArgs {
            dir: Some(pages.path().to_path_buf()),
            url: None,
            max_pages: Some(3),
        };
        run(sum_args, &mut store, &cfg, home.path()).await.unwrap();

        let last = store.last().unwrap().expect("saved entry");
        assert_eq!(last.total_usd, dec!(13.00));
        assert_eq!(last.approved_count, 1);
        assert_eq!(last.pages, 1);
        let today = zoned_date(Utc::now(), store.timezone());
        assert_eq!(last.date, today);
        assert!(store.log().unwrap().get(today).is_some());
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let home = tempfile::tempdir().unwrap();
        let mut store = Store::open(home.path()).unwrap();
        let err = run(args(None, None), &mut store, &Config::default(), home.path())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("no page source"));
    }
}
