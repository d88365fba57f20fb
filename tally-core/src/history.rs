//! Daily log of saved totals and weekly rollups.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateResult;
use crate::week::WeekWindow;

/// One saved day, in the shape written to the store and the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    /// Rounded to cents.
    #[serde(rename = "totalUSD")]
    pub total_usd: Decimal,
    pub approved_count: u32,
    pub awaiting_count: u32,
    pub counted_rows: u32,
    pub pages: u32,
    pub saved_at: DateTime<Utc>,
}

impl LogEntry {
    /// The only place where totals are rounded.
    pub fn from_aggregate(agg: &AggregateResult, saved_at: DateTime<Utc>) -> Self {
        Self {
            date: agg.date_key,
            total_usd: round_cents(agg.total_usd),
            approved_count: agg.approved_count(),
            awaiting_count: agg.awaiting_count(),
            counted_rows: agg.counted_rows,
            pages: agg.pages.max(1),
            saved_at,
        }
    }
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// All saved days, at most one entry per date, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog {
    entries: Vec<LogEntry>,
}

impl DailyLog {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        let mut log = Self::default();
        for entry in entries {
            log.upsert(entry);
        }
        log
    }

    /// Replace the entry for the same date, or append.
    pub fn upsert(&mut self, entry: LogEntry) {
        match self.entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Saved total for `date`, zero when nothing was saved.
    pub fn day_total(&self, date: NaiveDate) -> Decimal {
        self.get(date).map(|e| e.total_usd).unwrap_or(Decimal::ZERO)
    }

    /// Saved totals for each day of `week`, Sunday first.
    pub fn week_totals(&self, week: &WeekWindow) -> [Decimal; 7] {
        week.dates.map(|d| self.day_total(d))
    }

    pub fn week_total(&self, week: &WeekWindow) -> Decimal {
        self.week_totals(week).iter().sum()
    }
}
