//! Error types for `atlas-core`.

use std::fmt;

use thiserror::Error;

/// The external collaborator an [`UpstreamError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
  Countries,
  ExchangeRates,
}

impl fmt::Display for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Service::Countries => f.write_str("Country API"),
      Service::ExchangeRates => f.write_str("Exchange Rate API"),
    }
  }
}

/// An external API could not be reached or returned something unusable.
#[derive(Debug, Error)]
#[error("{service} unavailable: {reason}")]
pub struct UpstreamError {
  pub service: Service,
  pub reason:  String,
}

impl UpstreamError {
  pub fn new(service: Service, reason: impl Into<String>) -> Self {
    Self { service, reason: reason.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("no countries matched the given filters")]
  NoMatches,

  #[error(transparent)]
  Upstream(#[from] UpstreamError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("summary artifact error: {0}")]
  Artifact(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
