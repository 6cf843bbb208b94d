//! Symbol — the atomic rendering unit.
//!
//! A `Symbol` wraps one or more Unicode code points that must be drawn
//! as a single glyph: a plain ASCII letter, a combining-mark cluster, or
//! a multi-code-point emoji sequence. Splitting text into symbols uses
//! extended grapheme segmentation (`unicode-segmentation`), so a skin-tone
//! emoji stays one unit instead of four.
//!
//! Symbols are immutable, hashable, and ordered by code-point sequence —
//! they are the lookup key for every glyph-metrics table in retrobox.

use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// One renderable unit: an ordered, immutable sequence of ≥1 code points.
///
/// Equality and hashing are sequence equality, so `Symbol::from('A')`
/// and `Symbol::new("A")` are the same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Box<str>);

impl Symbol {
    /// Create a symbol from a string slice (one grapheme cluster).
    ///
    /// The caller is expected to pass a single cluster; nothing is
    /// re-segmented here.
    pub fn new(s: &str) -> Self {
        debug_assert!(!s.is_empty(), "Symbol must hold at least one code point");
        Self(s.into())
    }

    /// The underlying code-point sequence.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the code points of this symbol.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    /// The scalar id of a single-code-point symbol, `None` for clusters.
    ///
    /// Bitmap-font metrics files key characters by this integer id.
    pub fn code_point(&self) -> Option<u32> {
        let mut chars = self.0.chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            None
        } else {
            Some(first as u32)
        }
    }

    /// True if the symbol is a single ASCII space.
    pub fn is_space(&self) -> bool {
        &*self.0 == " "
    }

    /// Split text into symbols using extended grapheme segmentation.
    pub fn split(text: &str) -> Vec<Symbol> {
        text.graphemes(true).map(Symbol::new).collect()
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self::new(c.encode_utf8(&mut buf))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", &*self.0)
    }
}

// ===================================================================
// Tests
// ===================================================================
