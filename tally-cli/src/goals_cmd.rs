use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use tally_core::{GoalProgress, Goals, parse_goal, week_window, zoned_date};

use crate::render::goals_summary;
use crate::state::{KEY_GOALS, Store};

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    /// Print goals and progress from the saved log
    Show,

    /// Set goals in USD; pass an empty value to clear one
    Set {
        #[arg(long)]
        daily: Option<String>,

        #[arg(long)]
        weekly: Option<String>,
    },
}

pub fn run(cmd: GoalsCommand, store: &mut Store) -> Result<()> {
    match cmd {
        GoalsCommand::Show => {}
        GoalsCommand::Set { daily, weekly } => {
            let goals = apply(store.goals()?, daily.as_deref(), weekly.as_deref());
            store.set(KEY_GOALS, &goals)?;
            store.save()?;
        }
    }
    let (daily, weekly) = progress(store, Utc::now())?;
    println!("Goals\n{}", goals_summary(&daily, &weekly));
    Ok(())
}

/// Only the goals that were passed change.
fn apply(mut goals: Goals, daily: Option<&str>, weekly: Option<&str>) -> Goals {
    if let Some(d) = daily {
        goals.daily = parse_goal(d);
    }
    if let Some(w) = weekly {
        goals.weekly = parse_goal(w);
    }
    goals
}

/// Progress of the saved log for the day and week containing `now`.
pub fn progress(store: &Store, now: DateTime<Utc>) -> Result<(GoalProgress, GoalProgress)> {
    let zone = store.timezone();
    let log = store.log()?;
    let week = week_window(now, zone);
    let today = log.day_total(zoned_date(now, zone));
    Ok(store.goals()?.progress(today, log.week_total(&week)))
}
