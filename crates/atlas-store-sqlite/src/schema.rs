//! SQL schema for the country store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Singleton in practice: created on first refresh, deleted on clear.
CREATE TABLE IF NOT EXISTS refresh_batches (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    last_refreshed_at TEXT NOT NULL      -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS countries (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    name_key          TEXT NOT NULL UNIQUE,   -- lower-cased name
    capital           TEXT,
    region            TEXT,
    population        INTEGER NOT NULL,
    currency_code     TEXT,
    exchange_rate     REAL,
    estimated_gdp     REAL,
    flag_url          TEXT,
    last_refreshed_at TEXT NOT NULL,
    batch_id          INTEGER NOT NULL
                      REFERENCES refresh_batches(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS countries_batch_idx ON countries(batch_id);

PRAGMA user_version = 1;
";
