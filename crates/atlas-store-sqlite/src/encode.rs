//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings.

use atlas_core::country::{CountryRecord, RefreshBatch};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Column list matching [`RawRecord::from_row`].
pub const COUNTRY_COLUMNS: &str = "id, name, capital, region, population, currency_code,
  exchange_rate, estimated_gdp, flag_url, last_refreshed_at, batch_id";

/// A `countries` row as read from SQLite, before timestamp parsing.
pub struct RawRecord {
  pub id:                i64,
  pub name:              String,
  pub capital:           Option<String>,
  pub region:            Option<String>,
  pub population:        i64,
  pub currency_code:     Option<String>,
  pub exchange_rate:     Option<f64>,
  pub estimated_gdp:     Option<f64>,
  pub flag_url:          Option<String>,
  pub last_refreshed_at: String,
  pub batch_id:          i64,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      capital:           row.get(2)?,
      region:            row.get(3)?,
      population:        row.get(4)?,
      currency_code:     row.get(5)?,
      exchange_rate:     row.get(6)?,
      estimated_gdp:     row.get(7)?,
      flag_url:          row.get(8)?,
      last_refreshed_at: row.get(9)?,
      batch_id:          row.get(10)?,
    })
  }

  pub fn into_record(self) -> Result<CountryRecord> {
    Ok(CountryRecord {
      id:                self.id,
      name:              self.name,
      capital:           self.capital,
      region:            self.region,
      population:        self.population,
      currency_code:     self.currency_code,
      exchange_rate:     self.exchange_rate,
      estimated_gdp:     self.estimated_gdp,
      flag_url:          self.flag_url,
      last_refreshed_at: decode_dt(&self.last_refreshed_at)?,
      batch_id:          self.batch_id,
    })
  }
}

/// A `refresh_batches` row as read from SQLite.
pub struct RawBatch {
  pub id:                i64,
  pub last_refreshed_at: String,
}

impl RawBatch {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, last_refreshed_at: row.get(1)? })
  }

  pub fn into_batch(self) -> Result<RefreshBatch> {
    Ok(RefreshBatch {
      id:                self.id,
      last_refreshed_at: decode_dt(&self.last_refreshed_at)?,
    })
  }
}
