//! tally-ingest: reads the submissions table page by page and sums today's rows.

pub mod page;
pub mod readers;
pub mod rows;
pub mod scanner;
pub mod surface;
pub mod types;
pub mod walker;

pub use page::{aggregate_document, aggregate_page};
pub use rows::{ROW_SELECTORS, count_rows, extract_rows};
pub use scanner::{Admission, ScanError, Scanner};
pub use surface::{DirSurface, HttpSurface, RenderSurface, SurfaceError, settle};
pub use types::{MAX_PAGES, PAGE_WAIT, POLL_INTERVAL, PageOutcome, ScanContext, ScanOutcome};
pub use walker::walk_pages;
