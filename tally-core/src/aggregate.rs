//! Per-page and merged earnings totals for one zoned day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Count of counted rows per status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub approved: u32,
    pub awaiting_review: u32,
}

impl StatusCounts {
    pub fn bump(&mut self, status: Status) {
        match status {
            Status::Approved => self.approved += 1,
            Status::AwaitingReview => self.awaiting_review += 1,
        }
    }

    pub fn get(&self, status: Status) -> u32 {
        match status {
            Status::Approved => self.approved,
            Status::AwaitingReview => self.awaiting_review,
        }
    }

    pub fn total(&self) -> u32 {
        self.approved + self.awaiting_review
    }

    fn add(self, other: Self) -> Self {
        Self {
            approved: self.approved.saturating_add(other.approved),
            awaiting_review: self.awaiting_review.saturating_add(other.awaiting_review),
        }
    }
}

/// Today's contribution from a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub date_key: NaiveDate,
    /// Unrounded.
    pub total_usd: Decimal,
    pub counted_rows: u32,
    pub by_status: StatusCounts,
    pub page_number: u32,
}

impl PageResult {
    pub fn empty(date_key: NaiveDate, page_number: u32) -> Self {
        Self {
            date_key,
            total_usd: Decimal::ZERO,
            counted_rows: 0,
            by_status: StatusCounts::default(),
            page_number,
        }
    }

    /// Count one row. Returns `false`, leaving the page untouched, when the
    /// running total would overflow.
    pub fn add_row(&mut self, status: Status, usd: Decimal) -> bool {
        let Some(total) = self.total_usd.checked_add(usd) else {
            return false;
        };
        self.total_usd = total;
        self.counted_rows += 1;
        self.by_status.bump(status);
        true
    }
}

/// Today's total across every page scanned so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub date_key: NaiveDate,
    pub total_usd: Decimal,
    pub counted_rows: u32,
    pub by_status: StatusCounts,
    /// Highest page reached.
    pub pages: u32,
}

impl From<PageResult> for AggregateResult {
    fn from(page: PageResult) -> Self {
        Self {
            date_key: page.date_key,
            total_usd: page.total_usd,
            counted_rows: page.counted_rows,
            by_status: page.by_status,
            pages: page.page_number,
        }
    }
}

impl AggregateResult {
    /// Field-wise sum; `pages` keeps the furthest page. Totals saturate at
    /// the `Decimal` bounds instead of overflowing.
    ///
    /// Both sides must describe the same day.
    pub fn merge(&self, other: &Self) -> Self {
        debug_assert_eq!(self.date_key, other.date_key, "merging results of different days");
        Self {
            date_key: self.date_key,
            total_usd: self.total_usd.saturating_add(other.total_usd),
            counted_rows: self.counted_rows.saturating_add(other.counted_rows),
            by_status: self.by_status.add(other.by_status),
            pages: self.pages.max(other.pages),
        }
    }

    /// Fold one more page in.
    pub fn absorb(&mut self, page: PageResult) {
        *self = self.merge(&page.into());
    }

    pub fn approved_count(&self) -> u32 {
        self.by_status.approved
    }

    pub fn awaiting_count(&self) -> u32 {
        self.by_status.awaiting_review
    }
}
