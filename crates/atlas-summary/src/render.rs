//! [`PngSummary`] draws a [`Summary`] and manages `summary.png`.

use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
};

use atlas_core::summary::{Summary, SummaryPublisher};
use chrono::SecondsFormat;
use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use crate::{Error, Font, Result};

const WIDTH: u32 = 600;
const HEIGHT: u32 = 300;
const FILE_NAME: &str = "summary.png";

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Draw `summary` onto a fresh canvas.
pub fn render_image(summary: &Summary, font: &Font) -> RgbImage {
  let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

  let mut y = 20;
  font.draw(&mut img, 20, y, "Country Summary Report", INK);
  y += 40;
  font.draw(&mut img, 20, y, &format!("Total countries: {}", summary.total_countries), INK);
  y += 30;
  font.draw(&mut img, 20, y, "Top 5 by GDP:", INK);
  y += 30;
  for name in &summary.top_by_gdp {
    font.draw(&mut img, 40, y, name, INK);
    y += 25;
  }
  y += 20;
  let stamp = summary
    .last_refreshed_at
    .to_rfc3339_opts(SecondsFormat::Secs, true);
  font.draw(&mut img, 20, y, &format!("Last refreshed: {stamp}"), INK);

  img
}

/// Publishes the summary as `<cache_dir>/summary.png`.
///
/// Cloning is cheap; the loaded font is shared.
#[derive(Clone)]
pub struct PngSummary {
  path: PathBuf,
  font: Arc<Font>,
}

impl PngSummary {
  /// `font_path` is optional; unusable fonts fall back to the bitmap font.
  pub fn new(cache_dir: impl AsRef<Path>, font_path: Option<&Path>) -> Self {
    Self {
      path: cache_dir.as_ref().join(FILE_NAME),
      font: Arc::new(Font::load(font_path)),
    }
  }

  /// Where the artifact lives once published.
  pub fn path(&self) -> &Path { &self.path }

  /// Render and write the image, replacing any previous one.
  ///
  /// Writes to a sibling temp file first so readers never see a partial PNG.
  pub fn write(&self, summary: &Summary) -> Result<()> {
    if let Some(dir) = self.path.parent() {
      std::fs::create_dir_all(dir)?;
    }
    let img = render_image(summary, &self.font);
    let tmp = self.path.with_extension("png.tmp");
    img.save_with_format(&tmp, ImageFormat::Png)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

impl SummaryPublisher for PngSummary {
  type Error = Error;

  async fn publish(&self, summary: Summary) -> Result<()> {
    let this = self.clone();
    tokio::task::spawn_blocking(move || this.write(&summary)).await??;
    info!(path = %self.path.display(), "summary image written");
    Ok(())
  }

  async fn discard(&self) -> Result<bool> {
    match tokio::fs::remove_file(&self.path).await {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(e.into()),
    }
  }
}
