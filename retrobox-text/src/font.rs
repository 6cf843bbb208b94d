//! Bitmap-font metrics model.
//!
//! A [`BitmapFont`] is the parsed, immutable metrics of one pre-rasterized
//! font: per-symbol source rectangles into an atlas texture, draw offsets,
//! advance widths, and kerning pairs. It is built once (from a metrics
//! document or by the glyph collector) and never mutated afterwards, so
//! it can be shared freely behind an `Arc`.
//!
//! Lookups are O(1) hash-map hits. Unknown symbols resolve through a
//! fixed per-character fallback chain: the font's designated fallback
//! symbol, then `'?'`, then nothing (width 0, skipped when drawing).

use std::fmt;

use retrobox_core::{Point, Rect, Symbol};
use rustc_hash::FxHashMap;

/// Metrics for one renderable symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontChar {
    /// The symbol this entry renders.
    pub id: Symbol,
    /// Source rectangle in atlas space.
    pub rect: Rect,
    /// Offset applied to the cursor position when blitting.
    pub offset: Point,
    /// Horizontal cursor advance after this symbol.
    pub x_advance: i32,
}

/// Parsed metrics of one bitmap font. Immutable after construction.
#[derive(Debug)]
pub struct BitmapFont {
    /// Face name as declared by the metrics document.
    pub face: String,
    /// Declared point size.
    pub size: u32,
    /// Vertical distance between line tops.
    pub line_height: u32,
    /// Baseline offset from the line top.
    pub base: u32,
    /// Atlas texture dimensions the source rects refer to.
    pub texture_w: u32,
    pub texture_h: u32,

    chars: FxHashMap<Symbol, FontChar>,
    kernings: FxHashMap<(Symbol, Symbol), i32>,
    fallback: Option<Symbol>,
}

impl BitmapFont {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        face: impl Into<String>,
        size: u32,
        line_height: u32,
        base: u32,
        texture_w: u32,
        texture_h: u32,
        chars: Vec<FontChar>,
        kernings: Vec<(Symbol, Symbol, i32)>,
    ) -> Self {
        let chars: FxHashMap<Symbol, FontChar> =
            chars.into_iter().map(|c| (c.id.clone(), c)).collect();
        let kernings: FxHashMap<(Symbol, Symbol), i32> = kernings
            .into_iter()
            .map(|(a, b, amount)| ((a, b), amount))
            .collect();
        Self {
            face: face.into(),
            size,
            line_height,
            base,
            texture_w,
            texture_h,
            chars,
            kernings,
            fallback: None,
        }
    }

    /// Designate a fallback symbol for unknown characters. Ignored if the
    /// font has no entry for it.
    pub fn with_fallback(mut self, symbol: Symbol) -> Self {
        if self.chars.contains_key(&symbol) {
            self.fallback = Some(symbol);
        } else {
            log::warn!(
                "BitmapFont {:?}: fallback symbol {symbol:?} has no glyph, ignoring",
                self.face,
            );
        }
        self
    }

    /// Number of symbols with metrics.
    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    /// Number of kerning pairs.
    pub fn kerning_count(&self) -> usize {
        self.kernings.len()
    }

    /// True if the font has an exact entry for `symbol` (no fallback).
    pub fn has_char(&self, symbol: &Symbol) -> bool {
        self.chars.contains_key(symbol)
    }

    /// Resolve metrics for a symbol through the fallback chain:
    /// exact entry → designated fallback → `'?'` → `None`.
    pub fn char_for(&self, symbol: &Symbol) -> Option<&FontChar> {
        if let Some(c) = self.chars.get(symbol) {
            return Some(c);
        }
        if let Some(fb) = &self.fallback {
            if let Some(c) = self.chars.get(fb) {
                return Some(c);
            }
        }
        self.chars.get(&Symbol::from('?'))
    }

    /// Kerning adjustment between two adjacent symbols (0 if none).
    pub fn kerning(&self, first: &Symbol, second: &Symbol) -> i32 {
        self.kernings
            .get(&(first.clone(), second.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Advance width of one symbol (0 for symbols with no metrics at all).
    pub fn char_advance(&self, symbol: &Symbol) -> i32 {
        self.char_for(symbol).map(|c| c.x_advance).unwrap_or(0)
    }

    /// Measured width of a symbol sequence: advances plus pairwise
    /// kerning adjustments.
    pub fn measure(&self, symbols: &[Symbol]) -> i32 {
        let mut width = 0;
        for (i, sym) in symbols.iter().enumerate() {
            if i > 0 {
                width += self.kerning(&symbols[i - 1], sym);
            }
            width += self.char_advance(sym);
        }
        width
    }

    /// Measured width of a string.
    pub fn measure_str(&self, text: &str) -> i32 {
        self.measure(&Symbol::split(text))
    }

    /// Iterate all character entries (unordered).
    pub fn chars(&self) -> impl Iterator<Item = &FontChar> {
        self.chars.values()
    }

    /// Iterate all kerning pairs (unordered).
    pub fn kernings(&self) -> impl Iterator<Item = (&(Symbol, Symbol), i32)> {
        self.kernings.iter().map(|(k, v)| (k, *v))
    }
}

impl fmt::Display for BitmapFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BitmapFont({} {}px, {} chars, {} kernings)",
            self.face,
            self.size,
            self.chars.len(),
            self.kernings.len(),
        )
    }
}

// ===================================================================
// Tests
// ===================================================================
