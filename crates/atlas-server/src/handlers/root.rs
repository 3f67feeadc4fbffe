//! `GET /` and `GET /favicon.ico`.

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

pub async fn welcome() -> Json<Value> {
  Json(json!({ "success": true, "message": "Welcome to the country atlas API" }))
}

/// No icon is served; browsers get an empty 204.
pub async fn favicon() -> StatusCode { StatusCode::NO_CONTENT }
