//! Exchange rates over HTTP (`{result, rates}` shape).

use atlas_core::{
  Service, UpstreamError,
  source::{ExchangeRates, RateSource},
};

use crate::UpstreamClient;

/// Fetches the rate table from a single URL.
///
/// A non-`"success"` `result` is returned as-is; the refresh pipeline decides
/// what it means.
#[derive(Clone)]
pub struct HttpRateSource {
  client: UpstreamClient,
  url:    String,
}

impl HttpRateSource {
  pub fn new(client: UpstreamClient, url: impl Into<String>) -> Self {
    Self { client, url: url.into() }
  }
}

impl RateSource for HttpRateSource {
  async fn fetch_rates(&self) -> Result<ExchangeRates, UpstreamError> {
    self.client.get_json(Service::ExchangeRates, &self.url).await
  }
}
