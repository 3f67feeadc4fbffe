//! The summary artifact's content and the trait that publishes it.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::country::CountryRecord;

/// How many countries the summary ranks.
pub const TOP_COUNT: usize = 5;

/// What the summary image shows. Pixel layout is up to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
  pub total_countries:   usize,
  /// Names of the highest estimated GDPs, best first.
  pub top_by_gdp:        Vec<String>,
  pub last_refreshed_at: DateTime<Utc>,
}

impl Summary {
  pub fn from_records(records: &[CountryRecord], last_refreshed_at: DateTime<Utc>) -> Self {
    let mut ranked: Vec<&CountryRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.gdp_or_zero().total_cmp(&a.gdp_or_zero()));

    Self {
      total_countries: records.len(),
      top_by_gdp: ranked
        .into_iter()
        .take(TOP_COUNT)
        .map(|c| c.name.clone())
        .collect(),
      last_refreshed_at,
    }
  }
}

/// Writes and removes the cached summary artifact.
pub trait SummaryPublisher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Render `summary`, replacing any previous artifact.
  fn publish(
    &self,
    summary: Summary,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the artifact. Returns `false` if there was nothing to remove.
  fn discard(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(name: &str, gdp: Option<f64>) -> CountryRecord {
    CountryRecord {
      id: 0,
      name: name.into(),
      capital: None,
      region: None,
      population: 0,
      currency_code: None,
      exchange_rate: None,
      estimated_gdp: gdp,
      flag_url: None,
      last_refreshed_at: Utc::now(),
      batch_id: 1,
    }
  }

  #[test]
  fn picks_top_five_by_gdp() {
    let records = vec![
      record("A", Some(1.0)),
      record("B", None),
      record("C", Some(7.0)),
      record("D", Some(3.0)),
      record("E", Some(9.0)),
      record("F", Some(5.0)),
      record("G", Some(2.0)),
    ];
    let at = Utc::now();
    let summary = Summary::from_records(&records, at);
    assert_eq!(summary.total_countries, 7);
    assert_eq!(summary.top_by_gdp, ["E", "C", "F", "D", "G"]);
    assert_eq!(summary.last_refreshed_at, at);
  }

  #[test]
  fn fewer_than_five_records() {
    let summary = Summary::from_records(&[record("Only", None)], Utc::now());
    assert_eq!(summary.total_countries, 1);
    assert_eq!(summary.top_by_gdp, ["Only"]);
  }
}
