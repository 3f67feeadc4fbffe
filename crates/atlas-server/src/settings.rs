//! Runtime configuration: built-in defaults, then an optional TOML file, then
//! `ATLAS_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use atlas_core::refresh::Multiplier;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_COUNTRIES_API_URL: &str =
  "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";
pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub database_path:         PathBuf,
  pub countries_api_url:     String,
  pub exchange_rate_url:     String,
  /// Directory holding `summary.png`.
  pub cache_dir:             PathBuf,
  /// Optional TrueType font for the summary image.
  #[serde(default)]
  pub font_path:             Option<PathBuf>,
  pub upstream_timeout_ms:   u64,
  pub rate_limit_per_minute: u32,
  #[serde(default)]
  pub multiplier:            Multiplier,
}

impl ServerConfig {
  /// Load configuration. A missing `file` is not an error.
  ///
  /// Nested keys use `__` in the environment, e.g. `ATLAS_MULTIPLIER__MODE`.
  pub fn load(file: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8000)?
      .set_default("database_path", "countries.db")?
      .set_default("countries_api_url", DEFAULT_COUNTRIES_API_URL)?
      .set_default("exchange_rate_url", DEFAULT_EXCHANGE_RATE_URL)?
      .set_default("cache_dir", "cache")?
      .set_default("upstream_timeout_ms", 3000)?
      .set_default("rate_limit_per_minute", 8)?
      .add_source(File::from(file).required(false))
      .add_source(
        Environment::with_prefix("ATLAS")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}
