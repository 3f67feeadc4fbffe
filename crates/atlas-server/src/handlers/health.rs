//! `GET /health`: liveness check, exempt from rate limiting.

use axum::Json;
use serde_json::{Value, json};

pub async fn handler() -> Json<Value> { Json(json!({ "success": true, "message": "Ok" })) }
