use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{week_window, zoned_date};
use tally_finance::{default_file_name, export_to_path};
use tracing_subscriber::EnvFilter;

mod config;
mod fx_cmd;
mod goals_cmd;
mod render;
mod state;
mod sum_cmd;
mod tz_cmd;

use fx_cmd::FxCommand;
use goals_cmd::GoalsCommand;
use state::{KEY_LAST, KEY_LOG, Store};
use sum_cmd::SumArgs;
use tz_cmd::TzCommand;

/// `tally --version`, e.g. `0.1.0 (3f9c2ab)`.
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version = VERSION, about = "Sum today's approved and pending study earnings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk the submissions pages and save today's total
    Sum(SumArgs),

    /// Print the last saved total with goal progress
    Show,

    /// Write the daily log as CSV
    Export {
        /// Output file (default: ./tally-YYYY-MM-DD.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Forget the last total and the daily log
    Clear,

    /// Time zone that defines "today"
    Tz {
        #[command(subcommand)]
        command: TzCommand,
    },

    /// GBP→USD rate
    Fx {
        #[command(subcommand)]
        command: FxCommand,
    },

    /// Daily and weekly goals
    Goals {
        #[command(subcommand)]
        command: GoalsCommand,
    },

    /// This week's saved totals, Sunday to Saturday
    Week,

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let home = state::ensure_tally_home()?;
    let cfg = config::load_config(&home)?;
    let mut store = Store::open(&home)?;

    match cli.command {
        Command::Sum(args) => sum_cmd::run(args, &mut store, &cfg, &home).await?,

        Command::Show => match store.last()? {
            None => println!("No saved total yet. Run: tally sum"),
            Some(entry) => {
                let zone = store.timezone();
                println!("{}", render::entry_summary(&entry, &store.fx()?, zone));
                println!("  Saved at: {}", entry.saved_at.with_timezone(&zone).format("%Y-%m-%d %H:%M %Z"));
                let (daily, weekly) = goals_cmd::progress(&store, Utc::now())?;
                println!("{}", render::goals_summary(&daily, &weekly));
            }
        },

        Command::Export { out } => {
            let log = store.log()?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(default_file_name(zoned_date(Utc::now(), store.timezone())))
            });
            let rows = export_to_path(&log, &path)?;
            println!("Exported {rows} day(s) to {}", path.display());
        }

        Command::Clear => {
            store.remove(KEY_LAST);
            store.remove(KEY_LOG);
            store.save()?;
            println!("Cleared saved totals.");
        }

        Command::Tz { command } => tz_cmd::run(command, &mut store)?,
        Command::Fx { command } => fx_cmd::run(command, &mut store, &cfg).await?,
        Command::Goals { command } => goals_cmd::run(command, &mut store)?,

        Command::Week => {
            let zone = store.timezone();
            let week = week_window(Utc::now(), zone);
            let totals = store.log()?.week_totals(&week);
            println!("{}", render::week_chart(&week, &totals, zone));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&home)?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}\n{}", config::config_path(&home).display(), s.trim_end());
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_carries_build_sha() {
        let err = Cli::try_parse_from(["tally", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        let text = err.to_string();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains(&format!("({})", env!("TALLY_BUILD_SHA"))));
    }
}
