//! Shared HTTP client for upstream APIs.

use std::time::Duration;

use atlas_core::{Service, UpstreamError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Async HTTP client used by every upstream source.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct UpstreamClient {
  client: Client,
}

impl UpstreamClient {
  /// Build a client whose every request fails after `timeout`.
  pub fn new(timeout: Duration) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }

  /// `GET url` and decode the JSON body.
  ///
  /// Upstream response bodies are never copied into the error.
  pub(crate) async fn get_json<T: DeserializeOwned>(
    &self,
    service: Service,
    url: &str,
  ) -> Result<T, UpstreamError> {
    debug!(%service, url, "fetching");

    let resp = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| UpstreamError::new(service, describe(&e)))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(UpstreamError::new(service, format!("responded with {status}")));
    }

    resp
      .json()
      .await
      .map_err(|e| UpstreamError::new(service, describe(&e)))
  }
}

fn describe(e: &reqwest::Error) -> String {
  if e.is_timeout() {
    "request timed out".to_owned()
  } else if e.is_decode() {
    "unexpected response body".to_owned()
  } else if e.is_connect() {
    "connection failed".to_owned()
  } else {
    "network error".to_owned()
  }
}
