//! Persistent country records and the refresh batch that owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A country merged from both upstream sources but not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCountry {
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        i64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

/// A stored country. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        i64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: DateTime<Utc>,
  /// The batch this row was last written under.
  #[serde(skip_serializing, default)]
  pub batch_id:          i64,
}

impl CountryRecord {
  /// Estimated GDP with a missing value counted as zero, as used for ranking.
  pub fn gdp_or_zero(&self) -> f64 { self.estimated_gdp.unwrap_or(0.0) }
}

/// Tracks when the store was last refreshed. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshBatch {
  pub id:                i64,
  pub last_refreshed_at: DateTime<Utc>,
}

/// The case-folded form of a country name used for lookups and uniqueness.
pub fn name_key(name: &str) -> String { name.trim().to_lowercase() }
