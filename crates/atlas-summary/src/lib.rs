//! Renders the cached summary image (`summary.png`).
//!
//! [`PngSummary`] implements [`atlas_core::summary::SummaryPublisher`]; the
//! CPU-bound drawing runs on tokio's blocking pool.

mod font;
mod render;

pub mod error;

pub use error::{Error, Result};
pub use font::Font;
pub use render::{PngSummary, render_image};
