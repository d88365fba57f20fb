//! Page aggregator: today's rows of one rendered page, summed.

use scraper::Html;
use tally_core::{PageResult, is_today};
use tracing::trace;

use crate::readers::{read_date, read_reward_usd, read_status};
use crate::rows::extract_rows;
use crate::types::{PageOutcome, ScanContext};

/// Parse `markup` and aggregate it.
pub fn aggregate_page(markup: &str, ctx: &ScanContext, page_number: u32) -> PageOutcome {
    let doc = Html::parse_document(markup);
    aggregate_document(&doc, ctx, page_number)
}

/// Sum today's approved and awaiting rows of `doc`.
///
/// Rows without a date, a known status or any money are skipped silently.
pub fn aggregate_document(doc: &Html, ctx: &ScanContext, page_number: u32) -> PageOutcome {
    let rows = extract_rows(doc);
    if rows.is_empty() {
        return PageOutcome::NoRows;
    }

    let mut result = PageResult::empty(ctx.date_key(), page_number);
    for (idx, row) in rows.into_iter().enumerate() {
        let Some(when) = read_date(row) else {
            trace!(page = page_number, row = idx, "skip: no date");
            continue;
        };
        if !is_today(&when, ctx.zone, ctx.now) {
            continue;
        }
        let Some(status) = read_status(row) else {
            trace!(page = page_number, row = idx, "skip: status not counted");
            continue;
        };
        let Some(usd) = read_reward_usd(row, &ctx.fx) else {
            trace!(page = page_number, row = idx, "skip: no reward amount");
            continue;
        };
        if !result.add_row(status, usd) {
            trace!(page = page_number, row = idx, "skip: total would overflow");
        }
    }
    PageOutcome::Counted(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_core::FxState;

    fn ctx() -> ScanContext {
        ScanContext::new(
            chrono_tz::America::Chicago,
            FxState::manual(1.3).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 17, 15, 0, 0).unwrap(),
        )
    }

    fn row(date: &str, status: &str, reward: &str) -> String {
        format!(
            r#"<div class="flex-table row" role="row">
                 <div class="cell study-date-cell">{date}</div>
                 <div class="cell study-status-cell"><span>{status}</span></div>
                 <div class="cell study-reward-cell">{reward}</div>
               </div>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body><section class="submissions-table">
                 <div class="flex-table row" role="row"><div role="columnheader">Date</div></div>
                 {}
               </section></body></html>"#,
            rows.join("\n")
        )
    }

    #[test]
    fn test_single_approved_gbp_row() {
        let markup = page(&[row("Today", "Approved", "£10.00")]);
        let PageOutcome::Counted(result) = aggregate_page(&markup, &ctx(), 1) else {
            panic!("expected rows");
        };
        assert_eq!(result.total_usd, dec!(13.00));
        assert_eq!(result.by_status.approved, 1);
        assert_eq!(result.by_status.awaiting_review, 0);
        assert_eq!(result.counted_rows, 1);
        assert_eq!(result.date_key.to_string(), "2026-10-17");
    }

    #[test]
    fn test_mixed_rows() {
        let markup = page(&[
            row("17 Oct 2026, 09:40", "Awaiting review", "£10.00 +£2.00"),
            row("Today, 08:00", "Approved", "$2.50"),
            row("Today, 07:00", "Returned", "£5.00"),
            row("Today, 06:00", "Approved", "—"),
            row("16 Oct 2026, 23:50", "Approved", "£8.00"),
            row("Yesterday", "Approved", "£8.00"),
        ]);
        let PageOutcome::Counted(result) = aggregate_page(&markup, &ctx(), 3) else {
            panic!("expected rows");
        };
        assert_eq!(result.counted_rows, 2);
        assert_eq!(result.by_status.awaiting_review, 1);
        assert_eq!(result.by_status.approved, 1);
        assert_eq!(result.total_usd, dec!(15.6) + dec!(2.50));
        assert_eq!(result.page_number, 3);
    }

    #[test]
    fn test_rows_but_none_today_is_zero_result() {
        let markup = page(&[row("Yesterday", "Approved", "£1.00")]);
        let outcome = aggregate_page(&markup, &ctx(), 2);
        assert!(matches!(outcome, PageOutcome::Counted(ref r) if r.counted_rows == 0));
    }

    #[test]
    fn test_no_structural_rows() {
        let markup = "<html><body><section class=\"submissions-table\"></section></body></html>";
        assert_eq!(aggregate_page(markup, &ctx(), 1), PageOutcome::NoRows);
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let a = row("Today", "Approved", "£1.11");
        let b = row("Today", "Submitted", "$2.22");
        let c = row("Today", "Approved", "-£0.33");
        let forward = aggregate_page(&page(&[a.clone(), b.clone(), c.clone()]), &ctx(), 1);
        let backward = aggregate_page(&page(&[c, b, a]), &ctx(), 1);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_huge_rewards_do_not_abort_the_page() {
        let markup = page(&[
            row("Today", "Approved", "£70000000000000000000000000000"),
            row("Today", "Approved", "$79228162514264337593543950335"),
            row("Today", "Submitted", "$1.00"),
            row("Today", "Approved", "£10.00"),
        ]);
        let PageOutcome::Counted(result) = aggregate_page(&markup, &ctx(), 1) else {
            panic!("expected rows");
        };
        // Only the Decimal::MAX row fits; every other row overflows and is skipped.
        assert_eq!(result.counted_rows, 1);
        assert_eq!(result.by_status.total(), result.counted_rows);
        assert_eq!(result.total_usd, rust_decimal::Decimal::MAX);
    }
}
