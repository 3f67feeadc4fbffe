//! [`SqliteStore`], the SQLite implementation of [`CountryStore`].

use std::path::Path;

use atlas_core::{
  country::{CountryRecord, NewCountry, RefreshBatch, name_key},
  store::CountryStore,
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{COUNTRY_COLUMNS, RawBatch, RawRecord, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A country store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CountryStore impl ───────────────────────────────────────────────────────

impl CountryStore for SqliteStore {
  type Error = Error;

  // ── Batch ─────────────────────────────────────────────────────────────────

  async fn ensure_batch(&self, at: DateTime<Utc>) -> Result<RefreshBatch> {
    let at_str = encode_dt(at);

    let raw: RawBatch = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing = tx
          .query_row(
            "SELECT id, last_refreshed_at FROM refresh_batches ORDER BY id LIMIT 1",
            [],
            RawBatch::from_row,
          )
          .optional()?;

        let batch = match existing {
          Some(b) => b,
          None => {
            tx.execute(
              "INSERT INTO refresh_batches (last_refreshed_at) VALUES (?1)",
              rusqlite::params![at_str],
            )?;
            RawBatch { id: tx.last_insert_rowid(), last_refreshed_at: at_str }
          }
        };
        tx.commit()?;
        Ok(batch)
      })
      .await?;

    raw.into_batch()
  }

  async fn touch_batch(&self, batch_id: i64, at: DateTime<Utc>) -> Result<RefreshBatch> {
    let at_str = encode_dt(at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE refresh_batches SET last_refreshed_at = ?1 WHERE id = ?2",
          rusqlite::params![at_str, batch_id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::BatchNotFound(batch_id));
    }
    Ok(RefreshBatch { id: batch_id, last_refreshed_at: at })
  }

  async fn current_batch(&self) -> Result<Option<RefreshBatch>> {
    let raw: Option<RawBatch> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, last_refreshed_at FROM refresh_batches ORDER BY id LIMIT 1",
              [],
              RawBatch::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBatch::into_batch).transpose()
  }

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn upsert_by_name(&self, batch_id: i64, country: NewCountry) -> Result<CountryRecord> {
    let key    = name_key(&country.name);
    let at_str = encode_dt(country.last_refreshed_at);

    let raw: RawRecord = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO countries (
             name, name_key, capital, region, population, currency_code,
             exchange_rate, estimated_gdp, flag_url, last_refreshed_at, batch_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT (name_key) DO UPDATE SET
             name              = excluded.name,
             capital           = excluded.capital,
             region            = excluded.region,
             population        = excluded.population,
             currency_code     = excluded.currency_code,
             exchange_rate     = excluded.exchange_rate,
             estimated_gdp     = excluded.estimated_gdp,
             flag_url          = excluded.flag_url,
             last_refreshed_at = excluded.last_refreshed_at,
             batch_id          = excluded.batch_id
           RETURNING {COUNTRY_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            country.name,
            key,
            country.capital,
            country.region,
            country.population,
            country.currency_code,
            country.exchange_rate,
            country.estimated_gdp,
            country.flag_url,
            at_str,
            batch_id,
          ],
          RawRecord::from_row,
        )?)
      })
      .await?;

    raw.into_record()
  }

  async fn list_all(&self) -> Result<Vec<CountryRecord>> {
    let raws: Vec<RawRecord> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<CountryRecord>> {
    let key = name_key(name);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE name_key = ?1"),
              rusqlite::params![key],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn delete_by_name(&self, name: &str) -> Result<bool> {
    let key = name_key(name);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM countries WHERE name_key = ?1",
          rusqlite::params![key],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn clear_all(&self) -> Result<u64> {
    let removed = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM countries", [])?;
        tx.execute("DELETE FROM refresh_batches", [])?;
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    Ok(removed as u64)
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM countries", [], |r| r.get(0))?))
      .await?;
    Ok(n as u64)
  }
}
