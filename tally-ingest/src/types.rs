use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tally_core::{AggregateResult, FxState, PageResult, zoned_date};

/// Hard ceiling on pages walked per scan.
pub const MAX_PAGES: u32 = 20;
/// How long one page may take to load and show rows.
pub const PAGE_WAIT: Duration = Duration::from_secs(20);
/// Interval between readiness checks while a page settles.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Everything one scan needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub zone: Tz,
    pub fx: FxState,
    /// Start of the scan; defines "today".
    pub now: DateTime<Utc>,
    pub max_pages: u32,
    pub page_wait: Duration,
    pub poll: Duration,
}

impl ScanContext {
    pub fn new(zone: Tz, fx: FxState, now: DateTime<Utc>) -> Self {
        Self {
            zone,
            fx,
            now,
            max_pages: MAX_PAGES,
            page_wait: PAGE_WAIT,
            poll: POLL_INTERVAL,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_timing(mut self, page_wait: Duration, poll: Duration) -> Self {
        self.page_wait = page_wait;
        self.poll = poll;
        self
    }

    /// Today's date in the scan's zone.
    pub fn date_key(&self) -> NaiveDate {
        zoned_date(self.now, self.zone)
    }
}

/// What one page contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// No structural rows at all: the page probably did not render.
    NoRows,
    /// Rows were present; `counted_rows` may be zero.
    Counted(PageResult),
}

/// Result of a whole scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Total(AggregateResult),
    /// Page 1 produced no rows.
    NoData,
}

impl ScanOutcome {
    pub fn total(&self) -> Option<&AggregateResult> {
        match self {
            ScanOutcome::Total(agg) => Some(agg),
            ScanOutcome::NoData => None,
        }
    }
}
