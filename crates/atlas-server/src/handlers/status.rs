//! `GET /status`: country count and last refresh time.

use atlas_core::store::CountryStore;
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct StatusBody {
  pub total_countries:   u64,
  pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// `GET /status`. 404 while the store is empty.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Json<StatusBody>, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let total = state.store.count().await.map_err(ApiError::internal)?;
  if total == 0 {
    return Err(ApiError::NotFound("No countries exist in db.".to_owned()));
  }

  let batch = state.store.current_batch().await.map_err(ApiError::internal)?;
  Ok(Json(StatusBody {
    total_countries:   total,
    last_refreshed_at: batch.map(|b| b.last_refreshed_at),
  }))
}
