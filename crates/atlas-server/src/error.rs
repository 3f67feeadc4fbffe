//! API error type and the uniform JSON error envelope.

use atlas_core::UpstreamError;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("method not allowed")]
  MethodNotAllowed,

  #[error("validation failed: {0:?}")]
  Validation(Vec<String>),

  #[error("rate limited")]
  RateLimited,

  #[error(transparent)]
  Upstream(#[from] UpstreamError),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Internal(Box::new(e))
  }
}

impl From<atlas_core::Error> for ApiError {
  fn from(e: atlas_core::Error) -> Self {
    match e {
      atlas_core::Error::NoMatches => ApiError::NotFound("Country not found".to_owned()),
      atlas_core::Error::Upstream(e) => ApiError::Upstream(e),
      atlas_core::Error::Store(e) | atlas_core::Error::Artifact(e) => ApiError::Internal(e),
    }
  }
}

/// `{success: false, error, details?}`
#[derive(Debug, Serialize)]
struct Envelope {
  success: bool,
  error:   String,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<Value>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error, details) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m, None),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m, None),
      ApiError::MethodNotAllowed => {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_owned(), None)
      }
      ApiError::Validation(d) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        "Validation failed".to_owned(),
        Some(Value::from(d)),
      ),
      ApiError::RateLimited => (
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests, please slow down.".to_owned(),
        None,
      ),
      ApiError::Upstream(e) => {
        warn!(error = %e, "upstream unavailable");
        (
          StatusCode::SERVICE_UNAVAILABLE,
          "External data source unavailable".to_owned(),
          Some(Value::from(format!("Could not fetch data from {}", e.service))),
        )
      }
      ApiError::Internal(e) => {
        error!(error = %e, "internal error");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned(), None)
      }
    };
    (status, Json(Envelope { success: false, error, details })).into_response()
  }
}
