//! Row date token.
//!
//! Prefers `<time datetime="...">`; otherwise the visible date text, e.g.
//!   17 Oct 2026, 14:05
//! and as a last resort whatever precedes a trailing label such as
//!   Today, 09:12Approved

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::{element_text, first_match};

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("valid time selector"));
static DATE_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".cell.study-date-cell").expect("valid date cell selector"));
static DATE_TESTID: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid*="date"]"#).expect("valid date testid selector")
});

static DATE_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}\s+[A-Za-z]{3}\s+\d{4})(?:,\s*(\d{1,2}:\d{2}))?")
        .expect("valid date text regex")
});
static TRAILING_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Approved|Read more|Payment|Status").expect("valid trailing label regex")
});
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Date token for `row`, or `None` if nothing date-like is present.
pub fn read_date(row: ElementRef<'_>) -> Option<String> {
    if let Some(stamp) = row
        .select(&TIME_SELECTOR)
        .filter_map(|t| t.value().attr("datetime"))
        .map(str::trim)
        .find(|s| !s.is_empty())
    {
        return Some(stamp.to_string());
    }

    let cell = first_match(row, &[&*DATE_CELL, &*DATE_TESTID]).unwrap_or(row);
    let raw = element_text(cell);

    if let Some(caps) = DATE_TEXT_RE.captures(&raw) {
        let day = WHITESPACE_RUN.replace_all(&caps[1], " ");
        return Some(match caps.get(2) {
            Some(time) => format!("{day}, {}", time.as_str()),
            None => day.into_owned(),
        });
    }

    let head = TRAILING_LABEL_RE.split(&raw).next().unwrap_or("").trim();
    if head.is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}
