//! Row date tokens: resolution to a calendar value and the "is it today" test.
//!
//! A token is whatever a row exposes as its date: a machine-readable stamp
//! (`2026-10-17T14:05:00Z`), a human date (`17 Oct 2026, 14:05`) or a relative
//! word (`Today`, `Yesterday at 9:12`).

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::zone::zoned_date;

static TODAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^today\b").expect("valid today regex"));
static YESTERDAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^yesterday\b").expect("valid yesterday regex"));

/// Wall-clock layouts, read in the scan's zone.
const CIVIL_DATETIME_FORMATS: [&str; 5] = [
    "%d %b %Y, %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const CIVIL_DATE_FORMATS: [&str; 2] = ["%d %b %Y", "%Y-%m-%d"];

/// What a date token means once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDate {
    Today,
    Yesterday,
    /// An absolute instant; its calendar date depends on the zone.
    Instant(DateTime<FixedOffset>),
    /// A wall-clock date already expressed in the user's zone.
    Civil(NaiveDate),
}

impl ResolvedDate {
    /// Calendar date in `zone`, relative to `now`.
    pub fn zoned_date(&self, zone: Tz, now: DateTime<Utc>) -> NaiveDate {
        let today = zoned_date(now, zone);
        match self {
            ResolvedDate::Today => today,
            ResolvedDate::Yesterday => today.pred_opt().unwrap_or(today),
            ResolvedDate::Instant(at) => zoned_date(at.with_timezone(&Utc), zone),
            ResolvedDate::Civil(date) => *date,
        }
    }
}

/// Parse a date token. Returns `None` for anything unrecognised.
pub fn resolve(token: &str) -> Option<ResolvedDate> {
    let t = token.trim();
    if t.is_empty() {
        return None;
    }
    if TODAY_RE.is_match(t) {
        return Some(ResolvedDate::Today);
    }
    if YESTERDAY_RE.is_match(t) {
        return Some(ResolvedDate::Yesterday);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(t) {
        return Some(ResolvedDate::Instant(at));
    }
    for fmt in CIVIL_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(ResolvedDate::Civil(ndt.date()));
        }
    }
    for fmt in CIVIL_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(t, fmt) {
            return Some(ResolvedDate::Civil(date));
        }
    }
    None
}

/// True when `token` falls on the same calendar day as `now`, both seen in `zone`.
///
/// "Today…" is always today and "Yesterday…" never is, whatever the zone.
pub fn is_today(token: &str, zone: Tz, now: DateTime<Utc>) -> bool {
    match resolve(token) {
        Some(ResolvedDate::Today) => true,
        Some(ResolvedDate::Yesterday) | None => false,
        Some(resolved) => resolved.zoned_date(zone, now) == zoned_date(now, zone),
    }
}
