//! The refresh pipeline: fetch → join by currency → derive GDP → upsert →
//! publish summary.
//!
//! The pipeline takes no locks. Each upsert is atomic on its own, but two
//! overlapping refreshes may interleave their writes; the last writer wins.
//! The HTTP layer's rate limiter is the only thing keeping refreshes apart.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng as _;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
  Error, Result, Service, UpstreamError,
  country::NewCountry,
  source::{CountrySource, ExchangeRates, RateSource, RawCountry},
  store::CountryStore,
  summary::{Summary, SummaryPublisher},
};

// ─── Multiplier ──────────────────────────────────────────────────────────────

/// The factor applied to `population × exchange_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Multiplier {
  /// A uniform integer in `[low, high]`, drawn per country.
  Random { low: u32, high: u32 },
  /// Always `value`; makes derivation reproducible.
  Fixed { value: u32 },
}

impl Default for Multiplier {
  fn default() -> Self { Multiplier::Random { low: 1000, high: 2000 } }
}

impl Multiplier {
  pub fn sample(&self) -> f64 {
    match *self {
      Multiplier::Random { low, high } => {
        let (lo, hi) = (low.min(high), low.max(high));
        f64::from(rand::thread_rng().gen_range(lo..=hi))
      }
      Multiplier::Fixed { value } => f64::from(value),
    }
  }
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Estimated GDP for one country.
///
/// No currency yields `0`; a currency without a known rate yields `None`.
pub fn estimate_gdp(
  population: i64,
  currency_code: Option<&str>,
  exchange_rate: Option<f64>,
  multiplier: f64,
) -> Option<f64> {
  match (currency_code, exchange_rate) {
    (None, _) => Some(0.0),
    (Some(_), None) => None,
    (Some(_), Some(rate)) => Some(population as f64 * rate * multiplier),
  }
}

/// Join one fetched country with the rate table.
pub fn merge(
  raw: RawCountry,
  rates: &ExchangeRates,
  multiplier: f64,
  refreshed_at: DateTime<Utc>,
) -> NewCountry {
  let currency_code = raw.currency_code().map(str::to_owned);
  let exchange_rate = currency_code.as_deref().and_then(|code| rates.rate(code));
  let estimated_gdp =
    estimate_gdp(raw.population, currency_code.as_deref(), exchange_rate, multiplier);

  NewCountry {
    name: raw.name,
    capital: raw.capital,
    region: raw.region,
    population: raw.population,
    currency_code,
    exchange_rate,
    estimated_gdp,
    flag_url: raw.flag,
    last_refreshed_at: refreshed_at,
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Owns everything a refresh cycle touches.
pub struct RefreshPipeline<S, C, R, P> {
  store:      Arc<S>,
  countries:  C,
  rates:      R,
  summary:    P,
  multiplier: Multiplier,
}

impl<S, C, R, P> RefreshPipeline<S, C, R, P>
where
  S: CountryStore,
  C: CountrySource,
  R: RateSource,
  P: SummaryPublisher,
{
  pub fn new(store: Arc<S>, countries: C, rates: R, summary: P, multiplier: Multiplier) -> Self {
    Self { store, countries, rates, summary, multiplier }
  }

  pub fn summary(&self) -> &P { &self.summary }

  /// Run one refresh cycle and return the merged countries.
  ///
  /// Both upstream calls complete before anything is written, so an upstream
  /// failure leaves the store untouched.
  pub async fn refresh(&self) -> Result<Vec<NewCountry>> {
    let fetched = self.countries.fetch_countries().await?;
    let rates = self.rates.fetch_rates().await?;
    if !rates.is_success() {
      return Err(
        UpstreamError::new(
          Service::ExchangeRates,
          format!("result was {:?}", rates.result),
        )
        .into(),
      );
    }

    let now = Utc::now();
    let merged: Vec<NewCountry> = fetched
      .into_iter()
      .map(|raw| merge(raw, &rates, self.multiplier.sample(), now))
      .collect();

    let batch = self.store.ensure_batch(now).await.map_err(Error::store)?;
    for country in &merged {
      self
        .store
        .upsert_by_name(batch.id, country.clone())
        .await
        .map_err(Error::store)?;
    }
    let batch = self.store.touch_batch(batch.id, now).await.map_err(Error::store)?;

    info!(countries = merged.len(), batch = batch.id, "refresh committed");

    self.publish_summary(batch.last_refreshed_at).await;
    Ok(merged)
  }

  /// Delete every stored country and the cached summary artifact.
  pub async fn clear_all(&self) -> Result<u64> {
    let removed = self.store.clear_all().await.map_err(Error::store)?;
    let discarded = self
      .summary
      .discard()
      .await
      .map_err(|e| Error::Artifact(Box::new(e)))?;
    info!(removed, discarded, "store cleared");
    Ok(removed)
  }

  async fn publish_summary(&self, at: DateTime<Utc>) {
    let records = match self.store.list_all().await {
      Ok(records) => records,
      Err(e) => {
        warn!(error = %e, "could not load countries for summary");
        return;
      }
    };
    if let Err(e) = self.summary.publish(Summary::from_records(&records, at)).await {
      warn!(error = %e, "summary render failed");
    }
  }
}
