//! FontSet — shared metrics plus per-variation atlas images.
//!
//! A [`FontSet`] couples one [`BitmapFont`] (the metrics) with any
//! number of named *variations*: distinct color/style atlas renditions
//! that all share the same glyph source rectangles. Each variation
//! lazily cuts glyph sub-images out of its atlas on first use and
//! memoizes them.
//!
//! Cached glyphs are handed out as `Arc<RgbaImage>` — shared, immutable
//! views that may outlive any single draw call without ever aliasing a
//! mutable buffer. Freshly composited canvases elsewhere are plain
//! owned `RgbaImage`s; the two never mix.

use std::sync::Arc;

use image::RgbaImage;
use parking_lot::RwLock;
use retrobox_core::{pixmap, Symbol};
use rustc_hash::FxHashMap;

use crate::font::BitmapFont;

/// One color/style rendition of a font's atlas.
#[derive(Debug)]
pub struct Variation {
    name: String,
    atlas: RgbaImage,
    /// Lazily cut glyph cache, keyed by the resolved entry's own symbol
    /// so fallback hits share one cut.
    glyphs: RwLock<FxHashMap<Symbol, Arc<RgbaImage>>>,
}

impl Variation {
    fn new(name: String, atlas: RgbaImage) -> Self {
        Self {
            name,
            atlas,
            glyphs: RwLock::new(FxHashMap::default()),
        }
    }

    /// Full variation name (may be a path like `"embossed/white"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base color name: the last path segment, lowercased.
    /// `"embossed/White"` → `"white"`.
    pub fn color_name(&self) -> String {
        self.name
            .rsplit('/')
            .next()
            .unwrap_or(&self.name)
            .to_lowercase()
    }

    /// Number of glyphs cut so far.
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.read().len()
    }

    /// The pre-cut glyph bitmap for `symbol`, resolved through the
    /// font's fallback chain. `None` for symbols with no metrics or an
    /// empty source rect (spaces).
    pub fn glyph(&self, font: &BitmapFont, symbol: &Symbol) -> Option<Arc<RgbaImage>> {
        let entry = font.char_for(symbol)?;
        if entry.rect.is_empty() {
            return None;
        }
        if let Some(cached) = self.glyphs.read().get(&entry.id) {
            return Some(Arc::clone(cached));
        }
        let cut = Arc::new(pixmap::crop(&self.atlas, entry.rect));
        // A concurrent cut of the same glyph is deterministic; keeping
        // either copy is fine.
        self.glyphs
            .write()
            .entry(entry.id.clone())
            .or_insert_with(|| Arc::clone(&cut));
        Some(cut)
    }
}

/// One bitmap font plus its named variations.
#[derive(Debug)]
pub struct FontSet {
    font: Arc<BitmapFont>,
    variations: FxHashMap<String, Variation>,
}

impl FontSet {
    pub fn new(font: Arc<BitmapFont>) -> Self {
        Self {
            font,
            variations: FxHashMap::default(),
        }
    }

    /// Shared metrics.
    pub fn font(&self) -> &BitmapFont {
        &self.font
    }

    /// Clone the metrics handle.
    pub fn font_arc(&self) -> Arc<BitmapFont> {
        Arc::clone(&self.font)
    }

    /// Register a variation atlas under `name`.
    ///
    /// All variations must share the metrics' source rectangles, so an
    /// atlas smaller than the declared texture size is almost certainly
    /// a bundling defect — it is accepted but logged.
    pub fn add_variation(&mut self, name: impl Into<String>, atlas: RgbaImage) {
        let name = name.into();
        if atlas.width() < self.font.texture_w || atlas.height() < self.font.texture_h {
            log::warn!(
                "variation {name:?} atlas is {}x{}, metrics declare {}x{}",
                atlas.width(),
                atlas.height(),
                self.font.texture_w,
                self.font.texture_h,
            );
        }
        self.variations.insert(name.clone(), Variation::new(name, atlas));
    }

    pub fn variation(&self, name: &str) -> Option<&Variation> {
        self.variations.get(name)
    }

    /// Registered variation names, sorted.
    pub fn variation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ===================================================================
// Tests
// ===================================================================
