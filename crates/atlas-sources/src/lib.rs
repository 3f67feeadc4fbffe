//! HTTP adapters for the two upstream collaborators.
//!
//! Both sources share one [`UpstreamClient`], which owns the request timeout
//! and turns every transport, status or decoding failure into an
//! [`atlas_core::UpstreamError`].

mod client;
mod countries;
mod rates;

pub use client::UpstreamClient;
pub use countries::HttpCountrySource;
pub use rates::HttpRateSource;
