//! Single-flight entry point: at most one scan runs at a time.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::surface::RenderSurface;
use crate::types::{ScanContext, ScanOutcome};
use crate::walker::walk_pages;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("a scan is already running")]
    InProgress,
}

/// What to do when a scan is requested while another is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Admission {
    /// Wait for the running scan, then go.
    #[default]
    Queue,
    /// Fail fast with [`ScanError::InProgress`].
    Reject,
}

/// Runs one scan at a time.
///
/// [`Scanner::cancel`] targets the scan currently running: it stops before its
/// next page, and the request is cleared when that scan exits. Scans still
/// waiting at the gate are not affected, and a cancel with nothing running is
/// ignored.
#[derive(Debug, Default)]
pub struct Scanner {
    gate: Mutex<()>,
    running: AtomicBool,
    cancel: AtomicBool,
}

/// Marks a scan as running for its lifetime, including when its future is dropped.
struct RunningScan<'a> {
    scanner: &'a Scanner,
}

impl<'a> RunningScan<'a> {
    fn start(scanner: &'a Scanner) -> Self {
        scanner.running.store(true, Ordering::SeqCst);
        Self { scanner }
    }
}

impl Drop for RunningScan<'_> {
    fn drop(&mut self) {
        self.scanner.running.store(false, Ordering::SeqCst);
        self.scanner.cancel.store(false, Ordering::SeqCst);
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum today's earnings across pages loaded into `surface`.
    pub async fn extract_today_total<S>(
        &self,
        surface: &mut S,
        ctx: &ScanContext,
        admission: Admission,
    ) -> Result<ScanOutcome, ScanError>
    where
        S: RenderSurface + ?Sized,
    {
        let _guard = match admission {
            Admission::Queue => self.gate.lock().await,
            Admission::Reject => self.gate.try_lock().map_err(|_| ScanError::InProgress)?,
        };
        let _running = RunningScan::start(self);

        info!(
            zone = %ctx.zone,
            date = %ctx.date_key(),
            max_pages = ctx.max_pages,
            fx = %ctx.fx.label(),
            "scan started"
        );
        let outcome = walk_pages(surface, ctx, &self.cancel).await;
        match &outcome {
            ScanOutcome::Total(agg) => info!(
                pages = agg.pages,
                rows = agg.counted_rows,
                total = %agg.total_usd,
                "scan finished"
            ),
            ScanOutcome::NoData => info!("scan finished without rows"),
        }
        Ok(outcome)
    }

    /// Ask the running scan to stop before its next page.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        if !self.running.load(Ordering::SeqCst) {
            self.cancel.store(false, Ordering::SeqCst);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
