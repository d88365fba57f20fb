use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use tally_core::{FxMode, FxStamp, FxState};
use tally_finance::fetch_gbp_usd;
use tracing::{info, warn};

use crate::config::Config;
use crate::state::{KEY_FX, Store};

#[derive(Subcommand, Debug)]
pub enum FxCommand {
    /// Print the GBP→USD rate in use
    Show,

    /// Fetch a live rate and switch to auto mode
    Sync,

    /// Pin a manual GBP→USD rate
    Set {
        /// e.g. 1.27
        rate: f64,
    },
}

pub async fn run(cmd: FxCommand, store: &mut Store, cfg: &Config) -> Result<()> {
    match cmd {
        FxCommand::Show => {
            let fx = store.fx()?;
            warn_if_unusable(&fx);
            println!("GBP→USD: {}", fx.label());
        }
        FxCommand::Sync => {
            let fx = sync(store, cfg).await?;
            println!("GBP→USD: {}", fx.label());
        }
        FxCommand::Set { rate } => {
            let fx = FxState::manual(rate)?;
            store.set(KEY_FX, &fx)?;
            store.save()?;
            println!("GBP→USD: {}", fx.label());
        }
    }
    Ok(())
}

/// Fetch and store a live rate. A failed fetch keeps the last known rate.
pub async fn sync(store: &mut Store, cfg: &Config) -> Result<FxState> {
    let current = store.fx()?;
    let client = reqwest::Client::builder()
        .timeout(cfg.scan.request_timeout())
        .build()
        .context("build HTTP client")?;

    let quote = match fetch_gbp_usd(&client, &cfg.fx.endpoint).await {
        Ok(q) => q,
        Err(err) => {
            warn!(error = %err, "FX sync failed; keeping {}", current.label());
            return Ok(current);
        }
    };
    match current.apply_quote(&quote) {
        Ok(next) => {
            info!(rate = next.rate, as_of = %quote.as_of, "FX rate synced");
            store.set(KEY_FX, &next)?;
            store.save()?;
            Ok(next)
        }
        Err(err) => {
            warn!(error = %err, "FX sync returned an unusable rate; keeping {}", current.label());
            Ok(current)
        }
    }
}

/// In auto mode, sync once per day before a scan.
pub async fn refresh_if_stale(store: &mut Store, cfg: &Config, today: NaiveDate) -> Result<FxState> {
    let fx = store.fx()?;
    if fx.mode == FxMode::Auto && !synced_on(&fx, today) {
        return sync(store, cfg).await;
    }
    Ok(fx)
}

fn synced_on(fx: &FxState, day: NaiveDate) -> bool {
    match &fx.synced_at {
        Some(FxStamp::Synced(at)) => at.starts_with(&day.format("%Y-%m-%d").to_string()),
        _ => false,
    }
}

pub fn warn_if_unusable(fx: &FxState) {
    if !fx.is_rate_valid() {
        warn!(rate = fx.rate, "stored GBP→USD rate is unusable; converting at the default");
    }
}
