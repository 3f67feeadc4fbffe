//! Upstream collaborator traits and the transient shapes they produce.
//!
//! Implemented over HTTP by `atlas-sources`; tests substitute in-process fakes.

use std::{collections::HashMap, future::Future};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// One currency entry as reported by the country source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
  #[serde(default)]
  pub code:   Option<String>,
  #[serde(default)]
  pub name:   Option<String>,
  #[serde(default)]
  pub symbol: Option<String>,
}

/// A country as fetched, before it is joined with exchange rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCountry {
  pub name:       String,
  pub capital:    Option<String>,
  pub region:     Option<String>,
  pub population: i64,
  pub currencies: Vec<Currency>,
  pub flag:       Option<String>,
  pub fetched_at: DateTime<Utc>,
}

impl RawCountry {
  /// Code of the primary (first) currency. Blank codes count as absent.
  pub fn currency_code(&self) -> Option<&str> {
    self
      .currencies
      .first()
      .and_then(|c| c.code.as_deref())
      .map(str::trim)
      .filter(|code| !code.is_empty())
  }
}

/// The exchange rate payload: a result marker and a code → rate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
  pub result: String,
  #[serde(default)]
  pub rates:  HashMap<String, f64>,
}

impl ExchangeRates {
  pub fn is_success(&self) -> bool { self.result == "success" }

  pub fn rate(&self, code: &str) -> Option<f64> { self.rates.get(code).copied() }
}

/// Supplies country metadata.
pub trait CountrySource: Send + Sync {
  fn fetch_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<RawCountry>, UpstreamError>> + Send + '_;
}

/// Supplies currency exchange rates.
pub trait RateSource: Send + Sync {
  fn fetch_rates(
    &self,
  ) -> impl Future<Output = Result<ExchangeRates, UpstreamError>> + Send + '_;
}
