//! Fixed-window request quota per (route, client IP).

use std::{
  collections::HashMap,
  net::{IpAddr, Ipv4Addr, SocketAddr},
  sync::{Arc, Mutex, PoisonError},
  time::{Duration, Instant},
};

use axum::{
  extract::{ConnectInfo, MatchedPath, Request, State},
  middleware::Next,
  response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ApiError;

struct Window {
  opened: Instant,
  hits:   u32,
}

struct Table {
  windows:    HashMap<(String, IpAddr), Window>,
  last_sweep: Instant,
}

pub struct RateLimiter {
  quota:  u32,
  window: Duration,
  table:  Mutex<Table>,
}

impl RateLimiter {
  pub fn new(quota: u32, window: Duration) -> Self {
    Self {
      quota,
      window,
      table: Mutex::new(Table { windows: HashMap::new(), last_sweep: Instant::now() }),
    }
  }

  pub fn per_minute(quota: u32) -> Self { Self::new(quota, Duration::from_secs(60)) }

  /// Count one request at `now`. Returns `false` if the quota is spent.
  ///
  /// Expired windows are dropped at most once per window length.
  pub fn check(&self, route: &str, client: IpAddr, now: Instant) -> bool {
    let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);

    if now.saturating_duration_since(table.last_sweep) >= self.window {
      let window = self.window;
      table
        .windows
        .retain(|_, w| now.saturating_duration_since(w.opened) < window);
      table.last_sweep = now;
    }

    let window = table
      .windows
      .entry((route.to_owned(), client))
      .or_insert(Window { opened: now, hits: 0 });
    if now.saturating_duration_since(window.opened) >= self.window {
      *window = Window { opened: now, hits: 0 };
    }
    if window.hits >= self.quota {
      return false;
    }
    window.hits += 1;
    true
  }

  #[cfg(test)]
  fn tracked(&self) -> usize {
    self.table.lock().unwrap_or_else(PoisonError::into_inner).windows.len()
  }
}

/// Middleware: reject with 429 once a client spends its quota on a route.
///
/// Requests without connection info (e.g. in-process tests) share the
/// unspecified address.
pub async fn enforce(
  State(limiter): State<Arc<RateLimiter>>,
  req: Request,
  next: Next,
) -> Response {
  let path = req
    .extensions()
    .get::<MatchedPath>()
    .map(|p| p.as_str().to_owned())
    .unwrap_or_else(|| req.uri().path().to_owned());
  let route = format!("{} {path}", req.method());
  let client = req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip())
    .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

  if !limiter.check(&route, client, Instant::now()) {
    warn!(%client, route, "rate limit exceeded");
    return ApiError::RateLimited.into_response();
  }
  next.run(req).await
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALICE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
  const BOB: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

  #[test]
  fn quota_is_per_route_and_client() {
    let limiter = RateLimiter::per_minute(2);
    let now = Instant::now();

    assert!(limiter.check("GET /status", ALICE, now));
    assert!(limiter.check("GET /status", ALICE, now));
    assert!(!limiter.check("GET /status", ALICE, now));

    assert!(limiter.check("GET /status", BOB, now));
    assert!(limiter.check("GET /countries", ALICE, now));
  }

  #[test]
  fn window_resets() {
    let limiter = RateLimiter::new(1, Duration::from_secs(60));
    let start = Instant::now();

    assert!(limiter.check("GET /status", ALICE, start));
    assert!(!limiter.check("GET /status", ALICE, start + Duration::from_secs(59)));
    assert!(limiter.check("GET /status", ALICE, start + Duration::from_secs(60)));
  }

  #[test]
  fn expired_windows_are_swept_once_per_window() {
    let limiter = RateLimiter::new(5, Duration::from_secs(60));
    let start = Instant::now();

    for i in 0..100u8 {
      let ip = IpAddr::V4(Ipv4Addr::new(10, 1, 0, i));
      assert!(limiter.check("GET /status", ip, start));
    }
    assert_eq!(limiter.tracked(), 100);

    // Within the window nothing is dropped.
    assert!(limiter.check("GET /status", ALICE, start + Duration::from_secs(30)));
    assert_eq!(limiter.tracked(), 101);

    // One window later the stale entries go; ALICE's is only 30s old.
    assert!(limiter.check("GET /status", BOB, start + Duration::from_secs(61)));
    assert_eq!(limiter.tracked(), 2);
  }

  #[test]
  fn zero_quota_rejects_everything() {
    let limiter = RateLimiter::per_minute(0);
    assert!(!limiter.check("GET /status", ALICE, Instant::now()));
  }
}
