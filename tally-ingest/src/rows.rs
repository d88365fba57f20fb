//! Row extraction from the submissions table.
//!
//! The table markup shifts between site releases, so rows are located with a
//! list of selectors from most to least specific. The first selector that
//! yields at least one data row wins; results are never mixed across selectors.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

pub const ROW_SELECTORS: [&str; 3] = [
    r#"section.submissions-table div.flex-table.row[role="row"]"#,
    r#"section.submissions-table [data-testid*="submission"][role="row"]"#,
    r#"section.submissions-table [role="row"]"#,
];

static ROW_MATCHERS: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    ROW_SELECTORS
        .iter()
        .map(|css| (*css, Selector::parse(css).expect("valid row selector")))
        .collect()
});

static COLUMN_HEADER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[role="columnheader"]"#).expect("valid column header selector")
});

/// Data rows of `doc`, in document order. Empty when nothing matched.
pub fn extract_rows(doc: &Html) -> Vec<ElementRef<'_>> {
    for (css, selector) in ROW_MATCHERS.iter() {
        let rows: Vec<ElementRef<'_>> = doc
            .select(selector)
            .filter(|row| row.select(&COLUMN_HEADER).next().is_none())
            .collect();
        if !rows.is_empty() {
            trace!(selector = *css, count = rows.len(), "rows matched");
            return rows;
        }
    }
    Vec::new()
}

/// Number of data rows in raw markup; the readiness check while a page settles.
pub fn count_rows(markup: &str) -> usize {
    let doc = Html::parse_document(markup);
    extract_rows(&doc).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_specific_selector_wins() {
        let doc = Html::parse_document(
            r#"<section class="submissions-table">
                 <div class="flex-table row" role="row"><span>a</span></div>
                 <div class="flex-table row" role="row"><span>b</span></div>
                 <div role="row" data-testid="other"><span>c</span></div>
               </section>"#,
        );
        let rows = extract_rows(&doc);
        assert_eq!(rows.len(), 2);
        let texts: Vec<String> = rows.iter().map(|r| r.text().collect()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_header_rows_are_dropped() {
        let doc = Html::parse_document(
            r#"<section class="submissions-table">
                 <div role="row"><div role="columnheader">Date</div></div>
                 <div role="row"><div>17 Oct 2026</div></div>
               </section>"#,
        );
        let rows = extract_rows(&doc);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_falls_through_when_only_headers_match() {
        // The first selector matches only a header row; the generic one finds data.
        let doc = Html::parse_document(
            r#"<section class="submissions-table">
                 <div class="flex-table row" role="row"><div role="columnheader">Date</div></div>
                 <div role="row" data-testid="submission-42"><div>data</div></div>
               </section>"#,
        );
        let rows = extract_rows(&doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value().attr("data-testid"), Some("submission-42"));
    }

    #[test]
    fn test_no_table_is_empty_not_error() {
        assert_eq!(count_rows("<html><body><p>Loading…</p></body></html>"), 0);
        assert_eq!(count_rows(""), 0);
    }
}
