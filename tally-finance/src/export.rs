//! CSV export of the daily log.
//!
//! Columns: date,totalUSD,approvedCount,awaitingCount,countedRows,pages,savedAt
//! Every field is double-quoted.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, SecondsFormat};
use tally_core::DailyLog;

pub const EXPORT_HEADER: [&str; 7] = [
    "date",
    "totalUSD",
    "approvedCount",
    "awaitingCount",
    "countedRows",
    "pages",
    "savedAt",
];

/// `tally-YYYY-MM-DD.csv`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("tally-{}.csv", date.format("%Y-%m-%d"))
}

/// Write `log` as CSV into `out`. An empty log is an error.
pub fn write_csv<W: Write>(log: &DailyLog, out: W) -> Result<()> {
    if log.is_empty() {
        bail!("no data to export");
    }

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);
    wtr.write_record(EXPORT_HEADER)?;

    for entry in log.entries() {
        wtr.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", entry.total_usd),
            entry.approved_count.to_string(),
            entry.awaiting_count.to_string(),
            entry.counted_rows.to_string(),
            entry.pages.to_string(),
            entry.saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export `log` to `path`, returning the number of rows written.
pub fn export_to_path(log: &DailyLog, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if log.is_empty() {
        bail!("no data to export");
    }
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(log, file).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = log.len(), "exported log");
    Ok(log.len())
}
