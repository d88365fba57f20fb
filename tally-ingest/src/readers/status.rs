//! Row status.
//!
//! The status pill may carry its label in `aria-label`, in `title`, or only
//! as visible text; all three are offered to the classifier in that order.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tally_core::{Status, classify_first};

use super::{element_text, first_match};

static STATUS_CELL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".cell.study-status-cell").expect("valid status cell selector")
});
static STATUS_TESTID: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid*="submission-status"]"#).expect("valid status testid selector")
});
static STATUS_ROLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[role="status"]"#).expect("valid status role selector"));
static LABELLED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label], [title]").expect("valid labelled selector"));
static ANY_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("valid universal selector"));
static TEXT_BEARERS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span, div, strong, b").expect("valid text selector"));

/// Label candidates for `row`, most trustworthy first.
pub fn status_candidates(row: ElementRef<'_>) -> Vec<String> {
    let mut texts = Vec::new();

    if let Some(cell) = first_match(row, &[&*STATUS_CELL, &*STATUS_TESTID, &*STATUS_ROLE]) {
        let pill = cell
            .select(&LABELLED)
            .next()
            .or_else(|| cell.select(&ANY_ELEMENT).next())
            .unwrap_or(cell);
        for attr in ["aria-label", "title"] {
            if let Some(v) = pill.value().attr(attr).map(str::trim).filter(|v| !v.is_empty()) {
                texts.push(v.to_string());
            }
        }
        let text = Some(element_text(pill))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| element_text(cell));
        if !text.is_empty() {
            texts.push(text);
        }
    }

    if texts.is_empty() {
        texts.extend(
            row.select(&TEXT_BEARERS)
                .map(element_text)
                .filter(|t| !t.is_empty()),
        );
    }
    texts
}

/// Classified status of `row`, `None` when no candidate matches.
pub fn read_status(row: ElementRef<'_>) -> Option<Status> {
    let candidates = status_candidates(row);
    classify_first(candidates.iter().map(String::as_str))
}
