//! GBP→USD conversion state and the currency converter.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Currency;

/// Rate used whenever the configured one is unusable.
pub const DEFAULT_GBP_USD: f64 = 1.3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    #[error("exchange rate must be a positive number, got {0}")]
    InvalidRate(f64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FxMode {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "manual")]
    Manual,
}

/// Where the current rate came from. Persisted as `"manual"` or the sync date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FxStamp {
    Manual,
    Synced(String),
}

impl From<String> for FxStamp {
    fn from(s: String) -> Self {
        if s == "manual" {
            FxStamp::Manual
        } else {
            FxStamp::Synced(s)
        }
    }
}

impl From<FxStamp> for String {
    fn from(stamp: FxStamp) -> Self {
        match stamp {
            FxStamp::Manual => "manual".to_string(),
            FxStamp::Synced(s) => s,
        }
    }
}

/// A live quote as returned by a rate source.
#[derive(Debug, Clone, PartialEq)]
pub struct FxQuote {
    pub rate: f64,
    /// Date or timestamp reported by the source.
    pub as_of: String,
}

/// Current conversion configuration, owned by the caller and passed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxState {
    #[serde(default)]
    pub mode: FxMode,
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default)]
    pub synced_at: Option<FxStamp>,
}

fn default_rate() -> f64 {
    DEFAULT_GBP_USD
}

impl Default for FxState {
    fn default() -> Self {
        Self {
            mode: FxMode::Auto,
            rate: DEFAULT_GBP_USD,
            synced_at: None,
        }
    }
}

impl FxState {
    /// Pin a manual rate.
    pub fn manual(rate: f64) -> Result<Self, FxError> {
        if !is_usable(rate) {
            return Err(FxError::InvalidRate(rate));
        }
        Ok(Self {
            mode: FxMode::Manual,
            rate,
            synced_at: Some(FxStamp::Manual),
        })
    }

    /// Adopt a live quote; an unusable quote leaves the state untouched.
    pub fn apply_quote(&self, quote: &FxQuote) -> Result<Self, FxError> {
        if !is_usable(quote.rate) {
            return Err(FxError::InvalidRate(quote.rate));
        }
        Ok(Self {
            mode: FxMode::Auto,
            rate: quote.rate,
            synced_at: Some(FxStamp::Synced(quote.as_of.clone())),
        })
    }

    pub fn is_rate_valid(&self) -> bool {
        is_usable(self.rate)
    }

    /// The rate actually applied to GBP amounts.
    pub fn effective_rate(&self) -> Decimal {
        let rate = if self.is_rate_valid() {
            self.rate
        } else {
            DEFAULT_GBP_USD
        };
        Decimal::from_f64(rate)
            .or_else(|| Decimal::from_f64(DEFAULT_GBP_USD))
            .unwrap_or(Decimal::ONE)
    }

    /// Short human description, e.g. `1.2650 (auto • 2026-10-17)`.
    pub fn label(&self) -> String {
        let rate = if self.is_rate_valid() {
            self.rate
        } else {
            DEFAULT_GBP_USD
        };
        match (self.mode, &self.synced_at) {
            (FxMode::Manual, _) => format!("{rate:.4} (manual)"),
            (FxMode::Auto, Some(FxStamp::Synced(at))) => {
                let day = at.get(..10).unwrap_or(at);
                format!("{rate:.4} (auto • {day})")
            }
            (FxMode::Auto, _) => format!("{rate:.4} (auto)"),
        }
    }
}

fn is_usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Convert `amount` in `currency` to USD.
///
/// Only GBP is converted; USD, EUR and unknown currencies pass through unchanged.
/// `None` when the converted amount does not fit a `Decimal`.
pub fn to_usd(amount: Decimal, currency: Option<Currency>, fx: &FxState) -> Option<Decimal> {
    match currency {
        Some(Currency::Gbp) => amount.checked_mul(fx.effective_rate()),
        Some(Currency::Usd) | Some(Currency::Eur) | None => Some(amount),
    }
}
