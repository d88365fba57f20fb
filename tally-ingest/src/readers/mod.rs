//! Cell readers: pull the date, status and reward out of one table row.
//!
//! Each reader looks for its dedicated cell first and falls back to the whole
//! row, so a row still reads when the cell classes change.

pub mod date;
pub mod reward;
pub mod status;

pub use date::read_date;
pub use reward::read_reward_usd;
pub use status::read_status;

use scraper::ElementRef;

/// textContent-like text of an element, NBSP folded to a space, trimmed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// First descendant of `row` matching any of `selectors`, tried in order.
pub(crate) fn first_match<'a>(
    row: ElementRef<'a>,
    selectors: &[&scraper::Selector],
) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| row.select(sel).next())
}
