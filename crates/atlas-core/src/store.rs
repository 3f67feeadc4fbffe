//! The `CountryStore` trait.
//!
//! Implemented by storage backends (e.g. `atlas-store-sqlite`). The refresh
//! pipeline and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::country::{CountryRecord, NewCountry, RefreshBatch};

/// Abstraction over a country store backend.
///
/// Names are matched case-insensitively everywhere. At most one row exists
/// per case-folded name and at most one [`RefreshBatch`] exists at a time.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CountryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Batch ─────────────────────────────────────────────────────────────

  /// Return the current batch, creating it with timestamp `at` if none exists.
  fn ensure_batch(
    &self,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<RefreshBatch, Self::Error>> + Send + '_;

  /// Set the batch's `last_refreshed_at` to `at`.
  fn touch_batch(
    &self,
    batch_id: i64,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<RefreshBatch, Self::Error>> + Send + '_;

  /// The current batch, if any refresh has happened since the last clear.
  fn current_batch(
    &self,
  ) -> impl Future<Output = Result<Option<RefreshBatch>, Self::Error>> + Send + '_;

  // ── Countries ─────────────────────────────────────────────────────────

  /// Insert `country` under `batch_id`, or update every mutable field of the
  /// existing row with the same case-folded name.
  fn upsert_by_name(
    &self,
    batch_id: i64,
    country: NewCountry,
  ) -> impl Future<Output = Result<CountryRecord, Self::Error>> + Send + '_;

  /// All countries in insertion order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<CountryRecord>, Self::Error>> + Send + '_;

  /// Case-insensitive exact lookup. Returns `None` if not found.
  fn find_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<CountryRecord>, Self::Error>> + Send + 'a;

  /// Delete one country. Returns `false` if nothing matched.
  fn delete_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete every country and the batch. Returns the number of countries
  /// removed.
  fn clear_all(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
