//! Country metadata over HTTP (REST Countries v2 shape).

use atlas_core::{
  Service, UpstreamError,
  source::{CountrySource, Currency, RawCountry},
};
use chrono::Utc;
use serde::Deserialize;

use crate::UpstreamClient;

#[derive(Debug, Deserialize)]
struct WireCountry {
  name:       String,
  capital:    Option<String>,
  region:     Option<String>,
  population: i64,
  currencies: Option<Vec<Currency>>,
  flag:       Option<String>,
}

/// Fetches the full country list from a single URL.
#[derive(Clone)]
pub struct HttpCountrySource {
  client: UpstreamClient,
  url:    String,
}

impl HttpCountrySource {
  pub fn new(client: UpstreamClient, url: impl Into<String>) -> Self {
    Self { client, url: url.into() }
  }
}

impl CountrySource for HttpCountrySource {
  async fn fetch_countries(&self) -> Result<Vec<RawCountry>, UpstreamError> {
    let wire: Vec<WireCountry> = self.client.get_json(Service::Countries, &self.url).await?;
    let fetched_at = Utc::now();

    Ok(
      wire
        .into_iter()
        .map(|c| RawCountry {
          name: c.name,
          capital: c.capital,
          region: c.region,
          population: c.population,
          currencies: c.currencies.unwrap_or_default(),
          flag: c.flag,
          fetched_at,
        })
        .collect(),
    )
  }
}
