//! Glyph collection — the build-time pipeline that turns rasterized
//! glyphs into a packed atlas plus metrics.
//!
//! Rasterizing every distinct glyph of a font is embarrassingly
//! parallel and order-independent, so the fan-out runs on `rayon` into
//! an unordered bag; only afterwards are the results sorted by code
//! point for deterministic packing and emission. The platform-specific
//! rasterizer itself lives behind the [`GlyphSource`] seam — this crate
//! never touches OS text APIs.

use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;
use retrobox_core::{pixmap, Point, Rect, Symbol};

use crate::atlas::{self, PackSlot};
use crate::bmfont;
use crate::font::{BitmapFont, FontChar};

/// One rasterized glyph produced by a [`GlyphSource`].
pub struct GlyphBitmap {
    pub symbol: Symbol,
    pub image: RgbaImage,
    /// Draw offset relative to the cursor.
    pub offset: Point,
    /// Cursor advance.
    pub x_advance: i32,
}

/// Seam to the platform rasterizer (an external collaborator).
///
/// Implementations must be `Sync`: `raster` is called concurrently,
/// once per requested symbol, with no ordering guarantees.
pub trait GlyphSource: Sync {
    fn face(&self) -> &str;
    fn size(&self) -> u32;
    fn line_height(&self) -> u32;
    fn base(&self) -> u32;

    /// Rasterize one symbol, or `None` if the face cannot render it.
    fn raster(&self, symbol: &Symbol) -> Option<GlyphBitmap>;

    /// Kerning pairs for the collected set. Optional.
    fn kernings(&self) -> Vec<(Symbol, Symbol, i32)> {
        Vec::new()
    }
}

/// A packed atlas image plus the metrics describing it.
pub struct CollectedFont {
    pub font: BitmapFont,
    pub atlas: RgbaImage,
}

impl CollectedFont {
    /// Canonical metrics document for this font.
    pub fn metrics_document(&self) -> String {
        bmfont::emit(&self.font)
    }
}

/// Rasterize `symbols` through `source`, pack them, and build the font.
///
/// Symbols the source cannot render are silently dropped. The result is
/// deterministic for a given symbol set regardless of rasterization
/// order.
pub fn collect(source: &dyn GlyphSource, symbols: &[Symbol], padding: u32) -> CollectedFont {
    let start = Instant::now();

    // Parallel fan-out into an unordered bag.
    let mut glyphs: Vec<GlyphBitmap> = symbols
        .par_iter()
        .filter_map(|sym| source.raster(sym))
        .collect();

    // Order only matters from here on: canonical ascending sequence.
    glyphs.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    glyphs.dedup_by(|a, b| a.symbol == b.symbol);

    let mut slots: Vec<PackSlot> = glyphs
        .iter()
        .map(|g| PackSlot::new(g.image.width(), g.image.height()))
        .collect();
    let (atlas_w, atlas_h) = atlas::pack(&mut slots, padding);

    let mut atlas_img = pixmap::blank(atlas_w.max(1), atlas_h.max(1));
    let mut chars = Vec::with_capacity(glyphs.len());
    for (glyph, slot) in glyphs.iter().zip(&slots) {
        pixmap::blit_over(&mut atlas_img, &glyph.image, slot.x as i32, slot.y as i32);
        chars.push(FontChar {
            id: glyph.symbol.clone(),
            rect: Rect::new(
                slot.x as i32,
                slot.y as i32,
                glyph.image.width(),
                glyph.image.height(),
            ),
            offset: glyph.offset,
            x_advance: glyph.x_advance,
        });
    }

    let font = BitmapFont::new(
        source.face(),
        source.size(),
        source.line_height(),
        source.base(),
        atlas_img.width(),
        atlas_img.height(),
        chars,
        source.kernings(),
    );

    log::info!(
        "collected {} of {} glyphs for {} into {}x{} ({:.1}ms)",
        font.char_count(),
        symbols.len(),
        font,
        atlas_img.width(),
        atlas_img.height(),
        start.elapsed().as_secs_f64() * 1000.0,
    );

    CollectedFont {
        font,
        atlas: atlas_img,
    }
}

// ===================================================================
// Tests
// ===================================================================
