//! Integration tests for `SqliteStore` against an in-memory database.

use atlas_core::{country::NewCountry, store::CountryStore};
use chrono::{Duration, Utc};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn country(name: &str, region: &str, gdp: Option<f64>) -> NewCountry {
  NewCountry {
    name:              name.into(),
    capital:           Some(format!("{name} City")),
    region:            Some(region.into()),
    population:        1000,
    currency_code:     Some("TST".into()),
    exchange_rate:     Some(2.0),
    estimated_gdp:     gdp,
    flag_url:          Some(format!("https://flags.test/{name}.svg")),
    last_refreshed_at: Utc::now(),
  }
}

// ─── Batch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_has_no_batch() {
  let s = store().await;
  assert!(s.current_batch().await.unwrap().is_none());
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn ensure_batch_is_created_once() {
  let s = store().await;
  let t0 = Utc::now();
  let first = s.ensure_batch(t0).await.unwrap();
  let second = s.ensure_batch(t0 + Duration::minutes(5)).await.unwrap();

  assert_eq!(first.id, second.id);
  // An existing batch is returned as-is; only touch_batch moves the clock.
  assert_eq!(second.last_refreshed_at, t0);
}

#[tokio::test]
async fn touch_batch_bumps_timestamp() {
  let s = store().await;
  let t0 = Utc::now();
  let batch = s.ensure_batch(t0).await.unwrap();

  let later = t0 + Duration::seconds(30);
  s.touch_batch(batch.id, later).await.unwrap();

  let current = s.current_batch().await.unwrap().unwrap();
  assert_eq!(current.id, batch.id);
  assert_eq!(current.last_refreshed_at, later);
}

#[tokio::test]
async fn touch_missing_batch_errors() {
  let s = store().await;
  let result = s.touch_batch(42, Utc::now()).await;
  assert!(matches!(result, Err(Error::BatchNotFound(42))));
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_inserts_then_updates_in_place() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();

  let inserted = s
    .upsert_by_name(batch.id, country("Testland", "Europe", Some(10.0)))
    .await
    .unwrap();
  assert_eq!(inserted.batch_id, batch.id);

  let mut changed = country("TESTLAND", "Africa", Some(99.0));
  changed.population = 5;
  let updated = s.upsert_by_name(batch.id, changed).await.unwrap();

  assert_eq!(updated.id, inserted.id);
  assert_eq!(updated.name, "TESTLAND");
  assert_eq!(updated.region.as_deref(), Some("Africa"));
  assert_eq!(updated.population, 5);
  assert_eq!(updated.estimated_gdp, Some(99.0));
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn nullable_fields_roundtrip() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();

  let mut bare = country("Nowhere", "Antarctic", None);
  bare.capital = None;
  bare.region = None;
  bare.currency_code = None;
  bare.exchange_rate = None;
  bare.flag_url = None;
  let at = bare.last_refreshed_at;
  s.upsert_by_name(batch.id, bare).await.unwrap();

  let found = s.find_by_name("nowhere").await.unwrap().unwrap();
  assert_eq!(found.capital, None);
  assert_eq!(found.region, None);
  assert_eq!(found.currency_code, None);
  assert_eq!(found.exchange_rate, None);
  assert_eq!(found.estimated_gdp, None);
  assert_eq!(found.flag_url, None);
  assert_eq!(found.last_refreshed_at, at);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_by_name_is_case_insensitive() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();
  s.upsert_by_name(batch.id, country("Testland", "Europe", None)).await.unwrap();
  s.upsert_by_name(batch.id, country("Otherland", "Europe", None)).await.unwrap();

  for spelling in ["testland", "TESTLAND", "TestLand", " testland "] {
    let found = s.find_by_name(spelling).await.unwrap();
    assert_eq!(found.map(|c| c.name).as_deref(), Some("Testland"), "{spelling}");
  }
  assert!(s.find_by_name("test").await.unwrap().is_none());
}

#[tokio::test]
async fn list_all_keeps_insertion_order() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();
  for name in ["Charlie", "Alpha", "Bravo"] {
    s.upsert_by_name(batch.id, country(name, "Europe", None)).await.unwrap();
  }
  // Updating an existing row does not move it.
  s.upsert_by_name(batch.id, country("charlie", "Asia", None)).await.unwrap();

  let names: Vec<String> = s.list_all().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, ["charlie", "Alpha", "Bravo"]);
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_name() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();
  s.upsert_by_name(batch.id, country("Testland", "Europe", None)).await.unwrap();

  assert!(s.delete_by_name("TESTLAND").await.unwrap());
  assert!(!s.delete_by_name("testland").await.unwrap());
  assert_eq!(s.count().await.unwrap(), 0);
  // The batch outlives individual deletes.
  assert!(s.current_batch().await.unwrap().is_some());
}

#[tokio::test]
async fn clear_all_removes_countries_and_batch() {
  let s = store().await;
  let batch = s.ensure_batch(Utc::now()).await.unwrap();
  for name in ["A", "B", "C"] {
    s.upsert_by_name(batch.id, country(name, "Europe", None)).await.unwrap();
  }

  assert_eq!(s.clear_all().await.unwrap(), 3);
  assert_eq!(s.count().await.unwrap(), 0);
  assert!(s.current_batch().await.unwrap().is_none());
  assert_eq!(s.clear_all().await.unwrap(), 0);
}

#[tokio::test]
async fn new_batch_after_clear() {
  let s = store().await;
  let first = s.ensure_batch(Utc::now()).await.unwrap();
  s.clear_all().await.unwrap();
  let second = s.ensure_batch(Utc::now()).await.unwrap();
  assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn reopening_file_store_keeps_rows() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("countries.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    let batch = s.ensure_batch(Utc::now()).await.unwrap();
    s.upsert_by_name(batch.id, country("Testland", "Europe", Some(1.0))).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 1);
  assert!(s.current_batch().await.unwrap().is_some());
}
