//! Core types and trait definitions for the country atlas.
//!
//! This crate is free of HTTP, database and image dependencies.
//! The store, source and summary crates implement its traits; the server wires
//! them together.

// Traits spell out `Send` futures by hand; silence the advisory lint.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod query;
pub mod refresh;
pub mod source;
pub mod store;
pub mod summary;

pub use error::{Error, Result, Service, UpstreamError};
