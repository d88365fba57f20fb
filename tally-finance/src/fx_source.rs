//! Live GBP→USD quotes from an exchangerate.host-style JSON endpoint.
//!
//! Expected body:
//!   {"base":"GBP","date":"2026-10-17","rates":{"USD":1.2650}}

use chrono::Utc;
use serde::Deserialize;
use tally_core::FxQuote;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_FX_ENDPOINT: &str = "https://api.exchangerate.host/latest?base=GBP&symbols=USD";

#[derive(Debug, Error)]
pub enum FxSourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not parse rate response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response carried no usable USD rate")]
    NoRate,
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    date: Option<String>,
    #[serde(default)]
    rates: Rates,
}

#[derive(Debug, Default, Deserialize)]
struct Rates {
    #[serde(rename = "USD")]
    usd: Option<f64>,
}

/// Turn a response body into a quote. Missing dates fall back to now.
pub fn parse_quote(body: &str) -> Result<FxQuote, FxSourceError> {
    let resp: RateResponse = serde_json::from_str(body)?;
    let rate = resp
        .rates
        .usd
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or(FxSourceError::NoRate)?;
    let as_of = resp
        .date
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    Ok(FxQuote { rate, as_of })
}

/// Fetch the current GBP→USD rate from `endpoint`.
///
/// Callers keep their last known rate when this fails.
pub async fn fetch_gbp_usd(client: &reqwest::Client, endpoint: &str) -> Result<FxQuote, FxSourceError> {
    debug!(endpoint, "fetching FX rate");
    let body = client
        .get(endpoint)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_quote(&body)
}
