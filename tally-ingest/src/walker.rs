//! Pagination walker.
//!
//! Pages are walked strictly one after another on a single surface:
//!
//! - load or settle fails, or the page shows no rows at all: stop and keep what
//!   earlier pages gave (the page most likely did not render);
//! - rows are shown but none are today's: stop, this page counts as reached;
//! - otherwise merge the page and move on, up to `max_pages`.
//!
//! The listing must be newest-first; once a page has no rows for today no
//! later page can have any.

use std::sync::atomic::{AtomicBool, Ordering};

use tally_core::AggregateResult;
use tracing::{debug, info, warn};

use crate::page::aggregate_page;
use crate::surface::{RenderSurface, SurfaceError, settle};
use crate::types::{PageOutcome, ScanContext, ScanOutcome};

/// Walk pages `1..=ctx.max_pages` and merge today's totals.
///
/// `cancel` is only looked at between pages.
pub async fn walk_pages<S>(surface: &mut S, ctx: &ScanContext, cancel: &AtomicBool) -> ScanOutcome
where
    S: RenderSurface + ?Sized,
{
    let max_pages = ctx.max_pages.max(1);
    let mut agg: Option<AggregateResult> = None;

    for page in 1..=max_pages {
        if cancel.load(Ordering::SeqCst) {
            info!(page, "scan cancelled before page");
            break;
        }

        let markup = match load_and_settle(surface, page, ctx).await {
            Ok(markup) => markup,
            Err(err) => {
                warn!(page, error = %err, "page failed to render; keeping earlier pages");
                break;
            }
        };

        match aggregate_page(&markup, ctx, page) {
            PageOutcome::NoRows => {
                warn!(page, "no rows on page; keeping earlier pages");
                break;
            }
            PageOutcome::Counted(part) => {
                let end_of_today = part.counted_rows == 0;
                debug!(
                    page,
                    rows = part.counted_rows,
                    total = %part.total_usd,
                    "page aggregated"
                );
                match agg.as_mut() {
                    Some(total) => total.absorb(part),
                    None => agg = Some(part.into()),
                }
                if end_of_today {
                    info!(page, "no rows for today; stopping");
                    break;
                }
                if page == max_pages {
                    info!(page, "page ceiling reached");
                }
            }
        }
    }

    surface.release().await;
    match agg {
        Some(total) => ScanOutcome::Total(total),
        None => ScanOutcome::NoData,
    }
}

async fn load_and_settle<S>(surface: &mut S, page: u32, ctx: &ScanContext) -> Result<String, SurfaceError>
where
    S: RenderSurface + ?Sized,
{
    tokio::time::timeout(ctx.page_wait, surface.load(page))
        .await
        .map_err(|_| SurfaceError::Timeout(page))??;
    settle(surface, ctx.page_wait, ctx.poll).await
}
