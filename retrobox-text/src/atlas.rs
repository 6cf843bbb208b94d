//! Glyph atlas packing — single-pass shelf layout for font building.
//!
//! Glyphs are placed left-to-right into rows ("shelves"); a row's height
//! is the tallest glyph placed on it, and a glyph that would overrun the
//! working width starts a new row below. The working width is estimated
//! once from the total glyph area — `max(1024, ceil(sqrt(area)) × 2)` —
//! and never revisited, so rows may under-fill. This is a deliberate
//! heuristic, not a bin-packing optimum: the packer runs offline when
//! font assets are built and only needs to be deterministic.
//!
//! Callers typically sort glyphs by ascending code point first so the
//! resulting atlas is reproducible byte-for-byte.

use retrobox_core::Rect;

/// One glyph to place. `width`/`height` are inputs; `x`/`y` are assigned
/// by [`pack`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PackSlot {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl PackSlot {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    /// The assigned rectangle including the packing padding.
    pub fn padded_rect(&self, padding: u32) -> Rect {
        Rect::new(
            self.x as i32,
            self.y as i32,
            self.width + padding,
            self.height + padding,
        )
    }
}

/// Assign positions to every slot and return the atlas dimensions.
///
/// Deterministic given input order. All assigned rectangles (plus
/// `padding` on the right/bottom) are pairwise disjoint and contained
/// in the returned `(width, height)`.
pub fn pack(slots: &mut [PackSlot], padding: u32) -> (u32, u32) {
    if slots.is_empty() {
        return (0, 0);
    }

    let area: u64 = slots
        .iter()
        .map(|s| u64::from(s.width) * u64::from(s.height))
        .sum();
    let working_width = (((area as f64).sqrt().ceil() as u32) * 2).max(1024);

    let mut cursor_x = 0u32;
    let mut cursor_y = 0u32;
    let mut row_height = 0u32;
    let mut atlas_width = 0u32;

    for slot in slots.iter_mut() {
        let padded_w = slot.width + padding;
        let padded_h = slot.height + padding;

        // Overrunning the working width starts a new shelf, unless the
        // row is empty (a glyph wider than the atlas still gets a row).
        if cursor_x > 0 && cursor_x + padded_w > working_width {
            cursor_y += row_height;
            cursor_x = 0;
            row_height = 0;
        }

        slot.x = cursor_x;
        slot.y = cursor_y;
        cursor_x += padded_w;
        row_height = row_height.max(padded_h);
        atlas_width = atlas_width.max(cursor_x);
    }

    let atlas_height = cursor_y + row_height;
    log::debug!(
        "packed {} glyphs into {}x{} (working width {})",
        slots.len(),
        atlas_width,
        atlas_height,
        working_width,
    );
    (atlas_width, atlas_height)
}

// ===================================================================
// Tests
// ===================================================================
