//! tally-finance: live FX quotes and CSV export of the daily log

pub mod export;
pub mod fx_source;

pub use export::{EXPORT_HEADER, default_file_name, export_to_path, write_csv};
pub use fx_source::{DEFAULT_FX_ENDPOINT, FxSourceError, fetch_gbp_usd, parse_quote};
