//! Error type for `atlas-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to touch a batch that no longer exists.
  #[error("refresh batch not found: {0}")]
  BatchNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
