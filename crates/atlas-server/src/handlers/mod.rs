pub mod countries;
pub mod health;
pub mod root;
pub mod status;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError { ApiError::NotFound("Route not found".to_owned()) }

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError { ApiError::MethodNotAllowed }
