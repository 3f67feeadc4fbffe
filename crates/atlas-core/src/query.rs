//! Filtering and sorting of stored countries for the read endpoints.

use crate::{Error, Result, country::CountryRecord};

/// Ordering by estimated GDP. Missing values rank as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdpSort {
  Ascending,
  Descending,
}

impl GdpSort {
  /// Parse a `sort` query value. Unrecognised values yield `None`, which
  /// leaves store order untouched.
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "gdp_asc" | "asc" => Some(Self::Ascending),
      "gdp_desc" | "desc" => Some(Self::Descending),
      _ => None,
    }
  }
}

/// Parameters for [`select`].
#[derive(Debug, Clone, Default)]
pub struct CountryQuery {
  /// Case-insensitive substring of `currency_code`.
  pub currency: Option<String>,
  /// Case-insensitive substring of `region`.
  pub region:   Option<String>,
  pub sort:     Option<GdpSort>,
}

/// Apply `query` to `records`.
///
/// An empty result is reported as [`Error::NoMatches`], not as an empty list.
pub fn select(
  records: Vec<CountryRecord>,
  query: &CountryQuery,
) -> Result<Vec<CountryRecord>> {
  let currency = needle(query.currency.as_deref());
  let region = needle(query.region.as_deref());

  let mut matched: Vec<CountryRecord> = records
    .into_iter()
    .filter(|c| contains(c.currency_code.as_deref(), currency.as_deref()))
    .filter(|c| contains(c.region.as_deref(), region.as_deref()))
    .collect();

  if matched.is_empty() {
    return Err(Error::NoMatches);
  }

  // `sort_by` is stable, so equal GDPs keep store order.
  match query.sort {
    Some(GdpSort::Ascending) => {
      matched.sort_by(|a, b| a.gdp_or_zero().total_cmp(&b.gdp_or_zero()))
    }
    Some(GdpSort::Descending) => {
      matched.sort_by(|a, b| b.gdp_or_zero().total_cmp(&a.gdp_or_zero()))
    }
    None => {}
  }

  Ok(matched)
}

fn needle(filter: Option<&str>) -> Option<String> {
  filter
    .map(str::trim)
    .filter(|f| !f.is_empty())
    .map(str::to_lowercase)
}

fn contains(field: Option<&str>, needle: Option<&str>) -> bool {
  match (field, needle) {
    (_, None) => true,
    (None, Some(_)) => false,
    (Some(value), Some(n)) => value.to_lowercase().contains(n),
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn record(
    id: i64,
    name: &str,
    region: Option<&str>,
    currency: Option<&str>,
    gdp: Option<f64>,
  ) -> CountryRecord {
    CountryRecord {
      id,
      name: name.into(),
      capital: None,
      region: region.map(str::to_owned),
      population: 1,
      currency_code: currency.map(str::to_owned),
      exchange_rate: None,
      estimated_gdp: gdp,
      flag_url: None,
      last_refreshed_at: Utc::now(),
      batch_id: 1,
    }
  }

  fn sample() -> Vec<CountryRecord> {
    vec![
      record(1, "France", Some("Europe"), Some("EUR"), Some(300.0)),
      record(2, "Nigeria", Some("Africa"), Some("NGN"), Some(500.0)),
      record(3, "Germany", Some("Europe"), Some("EUR"), None),
      record(4, "Antarctica", None, None, Some(0.0)),
      record(5, "Japan", Some("Asia"), Some("JPY"), Some(900.0)),
    ]
  }

  fn names(records: &[CountryRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
  }

  #[test]
  fn no_filters_keeps_store_order() {
    let out = select(sample(), &CountryQuery::default()).unwrap();
    assert_eq!(names(&out), ["France", "Nigeria", "Germany", "Antarctica", "Japan"]);
  }

  #[test]
  fn region_filter_is_case_insensitive_substring() {
    let query = CountryQuery { region: Some("eu".into()), ..Default::default() };
    let out = select(sample(), &query).unwrap();
    assert_eq!(names(&out), ["France", "Germany"]);
    assert!(out.iter().all(|c| c.region.as_deref().unwrap().to_lowercase().contains("eu")));
  }

  #[test]
  fn filters_combine_with_and() {
    let query = CountryQuery {
      currency: Some("eur".into()),
      region:   Some("AFRICA".into()),
      sort:     None,
    };
    assert!(matches!(select(sample(), &query), Err(Error::NoMatches)));

    let query = CountryQuery {
      currency: Some("ngn".into()),
      region:   Some("afr".into()),
      sort:     None,
    };
    assert_eq!(names(&select(sample(), &query).unwrap()), ["Nigeria"]);
  }

  #[test]
  fn blank_filter_is_ignored() {
    let query = CountryQuery { currency: Some("  ".into()), ..Default::default() };
    assert_eq!(select(sample(), &query).unwrap().len(), 5);
  }

  #[test]
  fn empty_input_is_no_matches() {
    assert!(matches!(
      select(vec![], &CountryQuery::default()),
      Err(Error::NoMatches)
    ));
  }

  #[test]
  fn descending_sort_treats_missing_gdp_as_zero() {
    let query = CountryQuery { sort: Some(GdpSort::Descending), ..Default::default() };
    let out = select(sample(), &query).unwrap();
    assert_eq!(names(&out), ["Japan", "Nigeria", "France", "Germany", "Antarctica"]);
    for pair in out.windows(2) {
      assert!(pair[0].gdp_or_zero() >= pair[1].gdp_or_zero());
    }
  }

  #[test]
  fn ascending_sort_is_stable() {
    let query = CountryQuery { sort: Some(GdpSort::Ascending), ..Default::default() };
    let out = select(sample(), &query).unwrap();
    assert_eq!(names(&out), ["Germany", "Antarctica", "France", "Nigeria", "Japan"]);
  }

  #[test]
  fn sort_parsing() {
    assert_eq!(GdpSort::parse("gdp_desc"), Some(GdpSort::Descending));
    assert_eq!(GdpSort::parse("GDP_ASC"), Some(GdpSort::Ascending));
    assert_eq!(GdpSort::parse("desc"), Some(GdpSort::Descending));
    assert_eq!(GdpSort::parse("population"), None);
  }
}
