//! Handlers for `/countries` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/countries` | Optional `?currency=`, `?region=`, `?sort=gdp_asc\|gdp_desc`; 404 if nothing matches |
//! | `GET`    | `/countries/:name` | Case-insensitive; 400 if blank, 404 if absent |
//! | `DELETE` | `/countries/:name` | 400 if blank, 404 if absent |
//! | `POST`   | `/countries/refresh` | Runs a refresh cycle; 201 + merged list, 503 if upstream fails |
//! | `DELETE` | `/countries/clear` | Removes every country, the batch and the summary image |
//! | `GET`    | `/countries/image` | The cached `summary.png`; 404 before the first refresh |

use std::io;

use atlas_core::{
  country::{CountryRecord, NewCountry},
  query::{CountryQuery, GdpSort, select},
  store::CountryStore,
};
use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub currency: Option<String>,
  pub region:   Option<String>,
  pub sort:     Option<String>,
}

/// `GET /countries[?currency=...][&region=...][&sort=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<CountryRecord>>, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let Query(params) = params.map_err(|r| ApiError::Validation(vec![r.body_text()]))?;
  let query = CountryQuery {
    currency: params.currency,
    region:   params.region,
    sort:     params.sort.as_deref().and_then(GdpSort::parse),
  };

  let records = state.store.list_all().await.map_err(ApiError::internal)?;
  Ok(Json(select(records, &query)?))
}

// ─── Single country ──────────────────────────────────────────────────────────

fn country_name(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
  let Path(name) = path.map_err(|r| ApiError::Validation(vec![r.body_text()]))?;
  let name = name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("Country name can't be empty.".to_owned()));
  }
  Ok(name.to_owned())
}

/// `GET|DELETE /countries/`: a name segment is required.
pub async fn blank_name() -> ApiError {
  ApiError::BadRequest("Country name can't be empty.".to_owned())
}

/// `GET /countries/:name`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Json<CountryRecord>, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let name = country_name(path)?;
  let country = state
    .store
    .find_by_name(&name)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::NotFound("Country not found".to_owned()))?;
  Ok(Json(country))
}

/// `DELETE /countries/:name`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let name = country_name(path)?;
  let deleted = state
    .store
    .delete_by_name(&name)
    .await
    .map_err(ApiError::internal)?;
  if !deleted {
    return Err(ApiError::NotFound("Country not found".to_owned()));
  }
  Ok(Json(json!({ "success": true, "message": format!("Country '{name}' deleted") })))
}

// ─── Refresh / clear ─────────────────────────────────────────────────────────

/// `POST /countries/refresh`
pub async fn refresh<S>(
  State(state): State<AppState<S>>,
) -> Result<(StatusCode, Json<Vec<NewCountry>>), ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let merged = state.pipeline.refresh().await?;
  Ok((StatusCode::CREATED, Json(merged)))
}

/// `DELETE /countries/clear`
pub async fn clear<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let removed = state.pipeline.clear_all().await?;
  Ok(Json(json!({
    "success": true,
    "message": "All countries cleared",
    "removed": removed,
  })))
}

// ─── Image ───────────────────────────────────────────────────────────────────

/// `GET /countries/image`
pub async fn image<S>(State(state): State<AppState<S>>) -> Result<Response, ApiError>
where
  S: CountryStore + Clone + 'static,
{
  let path = state.pipeline.summary().path();
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(ApiError::NotFound("Summary image not found".to_owned()));
    }
    Err(e) => return Err(ApiError::internal(e)),
  };
  Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}
