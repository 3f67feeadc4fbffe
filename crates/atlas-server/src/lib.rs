//! HTTP surface for the country atlas.
//!
//! Exposes an axum [`Router`] backed by any [`CountryStore`], with the HTTP
//! upstream sources and the PNG summary renderer wired into a
//! [`RefreshPipeline`].

pub mod error;
pub mod handlers;
pub mod limit;
pub mod settings;

pub use error::ApiError;
pub use settings::ServerConfig;

use std::{any::Any, sync::Arc, time::Duration};

use atlas_core::{refresh::RefreshPipeline, store::CountryStore};
use atlas_sources::{HttpCountrySource, HttpRateSource, UpstreamClient};
use atlas_summary::PngSummary;
use axum::{
  Router, middleware,
  response::{IntoResponse, Response},
  routing::{delete, get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use handlers::{countries, health, root, status};
use limit::RateLimiter;

/// The refresh pipeline as wired for production.
pub type Pipeline<S> = RefreshPipeline<S, HttpCountrySource, HttpRateSource, PngSummary>;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CountryStore> {
  pub store:    Arc<S>,
  pub pipeline: Arc<Pipeline<S>>,
  pub limiter:  Arc<RateLimiter>,
}

impl<S: CountryStore> AppState<S> {
  /// Wire the upstream sources, renderer and rate limiter described by
  /// `config` around `store`.
  pub fn new(store: Arc<S>, config: &ServerConfig) -> reqwest::Result<Self> {
    let client = UpstreamClient::new(Duration::from_millis(config.upstream_timeout_ms))?;
    let pipeline = RefreshPipeline::new(
      store.clone(),
      HttpCountrySource::new(client.clone(), &config.countries_api_url),
      HttpRateSource::new(client, &config.exchange_rate_url),
      PngSummary::new(&config.cache_dir, config.font_path.as_deref()),
      config.multiplier,
    );

    Ok(Self {
      store,
      pipeline: Arc::new(pipeline),
      limiter: Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute)),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the atlas API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CountryStore + Clone + 'static,
{
  let limited = Router::new()
    .route("/countries", get(countries::list::<S>))
    .route("/countries/", get(countries::blank_name).delete(countries::blank_name))
    .route("/countries/refresh", post(countries::refresh::<S>))
    .route("/countries/clear", delete(countries::clear::<S>))
    .route("/countries/image", get(countries::image::<S>))
    .route(
      "/countries/{name}",
      get(countries::get_one::<S>).delete(countries::delete_one::<S>),
    )
    .route("/status", get(status::handler::<S>))
    .route_layer(middleware::from_fn_with_state(state.limiter.clone(), limit::enforce));

  Router::new()
    .route("/", get(root::welcome))
    .route("/favicon.ico", get(root::favicon))
    .route("/health", get(health::handler))
    .merge(limited)
    .method_not_allowed_fallback(handlers::method_not_allowed)
    .fallback(handlers::not_found)
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
  ApiError::Internal("handler panicked".into()).into_response()
}

// ─── Integration tests ────────────────────────────────────────────────────────
