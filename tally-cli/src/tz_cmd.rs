use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use tally_core::{date_key, parse_zone, zones_matching};

use crate::state::{KEY_TIMEZONE, Store};

#[derive(Subcommand, Debug)]
pub enum TzCommand {
    /// Print the zone that defines "today"
    Show,

    /// Set the zone by IANA name, e.g. Europe/London
    Set { zone: String },

    /// List zone names, optionally filtered by substring
    List { filter: Option<String> },
}

pub fn run(cmd: TzCommand, store: &mut Store) -> Result<()> {
    match cmd {
        TzCommand::Show => {
            let zone = store.timezone();
            println!("{zone} (today is {})", date_key(Utc::now(), zone));
        }
        TzCommand::Set { zone } => {
            let tz = parse_zone(&zone)?;
            store.set(KEY_TIMEZONE, &tz.name())?;
            store.save()?;
            println!("Time zone set to {tz} (today is {})", date_key(Utc::now(), tz));
        }
        TzCommand::List { filter } => {
            let current = store.timezone();
            let zones = zones_matching(filter.as_deref().unwrap_or(""), current);
            if zones.is_empty() {
                println!("No zones match.");
            }
            for name in zones {
                let marker = if name == current.name() { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_validates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path()).unwrap();

        assert!(run(TzCommand::Set { zone: "Nowhere/Land".into() }, &mut store).is_err());
        assert_eq!(store.timezone(), tally_core::DEFAULT_ZONE);

        run(TzCommand::Set { zone: "Asia/Tokyo".into() }, &mut store).unwrap();
        let reopened = Store::open(dir.path()).unwrap();
        assert_eq!(reopened.timezone(), chrono_tz::Asia::Tokyo);
    }
}
