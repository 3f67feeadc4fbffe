//! Text drawing: a TrueType font when one is configured, otherwise the
//! built-in 8×8 bitmap font.

use std::path::Path;

use ab_glyph::{Font as _, FontVec, GlyphId, PxScale, ScaleFont as _, point};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts as _};
use image::{Rgb, RgbImage};
use tracing::debug;

/// Pixel height used for TrueType text.
const TRUETYPE_PX: f32 = 18.0;
/// Integer upscale applied to the 8×8 bitmap glyphs.
const BITMAP_SCALE: u32 = 2;

pub enum Font {
  TrueType(FontVec),
  Bitmap,
}

impl Font {
  /// Load the font at `path`. Any failure falls back to [`Font::Bitmap`].
  pub fn load(path: Option<&Path>) -> Self {
    let Some(path) = path else { return Font::Bitmap };

    match std::fs::read(path).map(FontVec::try_from_vec) {
      Ok(Ok(font)) => Font::TrueType(font),
      Ok(Err(e)) => {
        debug!(path = %path.display(), error = %e, "invalid font, using bitmap font");
        Font::Bitmap
      }
      Err(e) => {
        debug!(path = %path.display(), error = %e, "unreadable font, using bitmap font");
        Font::Bitmap
      }
    }
  }

  /// Draw `text` with its top-left corner at `(x, y)`.
  pub fn draw(&self, img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    match self {
      Font::TrueType(font) => draw_truetype(font, img, x, y, text, color),
      Font::Bitmap => draw_bitmap(img, x, y, text, color),
    }
  }
}

fn draw_truetype(font: &FontVec, img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
  let scale = PxScale::from(TRUETYPE_PX);
  let scaled = font.as_scaled(scale);
  let baseline = y as f32 + scaled.ascent();
  let mut caret = x as f32;
  let mut previous: Option<GlyphId> = None;

  for ch in text.chars() {
    let id = scaled.glyph_id(ch);
    if let Some(prev) = previous {
      caret += scaled.kern(prev, id);
    }
    let glyph = id.with_scale_and_position(scale, point(caret, baseline));
    caret += scaled.h_advance(id);
    previous = Some(id);

    if let Some(outlined) = font.outline_glyph(glyph) {
      let bounds = outlined.px_bounds();
      outlined.draw(|gx, gy, coverage| {
        let px = bounds.min.x as i64 + i64::from(gx);
        let py = bounds.min.y as i64 + i64::from(gy);
        blend(img, px, py, color, coverage);
      });
    }
  }
}

fn draw_bitmap(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
  let advance = 8 * BITMAP_SCALE;
  for (i, ch) in text.chars().enumerate() {
    let Some(rows) = bitmap_glyph(ch) else { continue };
    let origin_x = i64::from(x) + i as i64 * i64::from(advance);

    for (row, bits) in rows.iter().enumerate() {
      for col in 0..8u32 {
        if bits & (1 << col) == 0 {
          continue;
        }
        for dy in 0..BITMAP_SCALE {
          for dx in 0..BITMAP_SCALE {
            let px = origin_x + i64::from(col * BITMAP_SCALE + dx);
            let py = i64::from(y) + row as i64 * i64::from(BITMAP_SCALE) + i64::from(dy);
            blend(img, px, py, color, 1.0);
          }
        }
      }
    }
  }
}

/// ASCII, then Latin-1 Supplement, then `?`.
fn bitmap_glyph(ch: char) -> Option<[u8; 8]> {
  BASIC_FONTS
    .get(ch)
    .or_else(|| LATIN_FONTS.get(ch))
    .or_else(|| BASIC_FONTS.get('?'))
}

/// Mix `color` into the pixel at `(x, y)` by `coverage`; off-canvas is a no-op.
fn blend(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
  if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
    return;
  }
  let coverage = coverage.clamp(0.0, 1.0);
  let pixel = img.get_pixel_mut(x as u32, y as u32);
  for (dst, src) in pixel.0.iter_mut().zip(color.0) {
    let mixed = f32::from(*dst) * (1.0 - coverage) + f32::from(src) * coverage;
    *dst = mixed.round() as u8;
  }
}
