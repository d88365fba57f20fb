//! Zoned Sunday-to-Saturday week windows for rollups and the sparkline.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The week containing some anchor instant, seen from one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekWindow {
    /// Sunday first.
    pub dates: [NaiveDate; 7],
    /// Noon UTC on each date; formats back to the same day in any zone within ±11h.
    pub anchors: [DateTime<Utc>; 7],
    /// Position of the anchor's own day, 0 = Sunday.
    pub today_index: usize,
}

impl WeekWindow {
    pub fn today(&self) -> NaiveDate {
        self.dates[self.today_index]
    }

    /// `(weekday name, date)` pairs in order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, NaiveDate)> + '_ {
        WEEKDAY_NAMES.iter().copied().zip(self.dates.iter().copied())
    }
}

/// Build the week of `anchor` in `zone`.
pub fn week_window(anchor: DateTime<Utc>, zone: Tz) -> WeekWindow {
    let local = anchor.with_timezone(&zone);
    let today_index = local.weekday().num_days_from_sunday() as usize;
    let start = local.date_naive() - TimeDelta::days(today_index as i64);

    let dates: [NaiveDate; 7] = std::array::from_fn(|i| start + TimeDelta::days(i as i64));
    let anchors = dates.map(|d| d.and_time(noon()).and_utc());

    WeekWindow {
        dates,
        anchors,
        today_index,
    }
}

fn noon() -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}
