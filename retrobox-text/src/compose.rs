//! Text compositor — rasterizes laid-out lines onto a transparent canvas.
//!
//! The compositor walks the wrapped lines of a draw request, blits each
//! symbol's pre-cut glyph bitmap from the selected [`Variation`], then
//! crops the canvas to the tight bounding box of visible pixels and
//! reports the recomputed baseline. An entirely blank render (empty
//! text, or text of only spaces) yields the 1×1 transparent sentinel
//! with reported dimensions `(0, 0)` and baseline 0 — "no visible
//! text", never an error.
//!
//! Optional extras: a mnemonic underline beneath the first symbol of a
//! line, and a drop shadow built from a blurred, offset, recolored
//! alpha mask composited behind the glyphs.

use image::{Rgba, RgbaImage};
use retrobox_core::{pixmap, Point, Rect};
use retrobox_core::Symbol;
use thiserror::Error;

use crate::fontset::FontSet;
use crate::layout::{self, Truncation, WrapMode};

#[derive(Error, Debug)]
pub enum TextError {
    #[error("font variation not found: {0:?}")]
    VariationNotFound(String),
}

/// Drop-shadow parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowSpec {
    /// Shadow color; the alpha channel scales the blurred mask.
    pub color: [u8; 4],
    /// Offset of the shadow relative to the glyphs.
    pub offset: Point,
    /// Box-blur radius; the mask is expanded by the same amount.
    pub radius: u32,
}

/// Parameters of one text draw.
#[derive(Clone, Debug, Default)]
pub struct DrawOptions {
    /// Wrap/truncation width. `None` lays out unbounded.
    pub max_width: Option<i32>,
    pub wrap: WrapMode,
    pub truncation: Truncation,
    /// Underline the first symbol of each line.
    pub mnemonic: bool,
    /// Extra pixels between line tops.
    pub line_spacing: i32,
    pub shadow: Option<ShadowSpec>,
}

/// An owned, cropped text raster plus its reported geometry.
pub struct TextRender {
    pub image: RgbaImage,
    /// Visible pixel dimensions; `(0, 0)` for a blank render.
    pub size: (u32, u32),
    /// Rows from the image top to the first line's baseline.
    pub baseline: i32,
}

impl TextRender {
    /// True if nothing visible was rendered.
    pub fn is_blank(&self) -> bool {
        self.size == (0, 0)
    }

    fn blank() -> Self {
        Self {
            image: pixmap::blank(1, 1),
            size: (0, 0),
            baseline: 0,
        }
    }
}

/// Fixed mnemonic underline palette, keyed by a variation's base color
/// name. Variations outside this table simply get no underline.
fn mnemonic_color(name: &str) -> Option<Rgba<u8>> {
    let rgb: [u8; 3] = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "navy" => [0, 0, 128],
        "yellow" => [255, 255, 0],
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// Rasterize `text` with the named variation.
pub fn draw(
    set: &FontSet,
    variation: &str,
    text: &str,
    opts: &DrawOptions,
) -> Result<TextRender, TextError> {
    let var = set
        .variation(variation)
        .ok_or_else(|| TextError::VariationNotFound(variation.to_string()))?;
    let font = set.font();

    let wrap_width = opts.max_width.unwrap_or(i32::MAX);
    let lines = layout::wrap(font, text, wrap_width, opts.wrap, opts.truncation);

    let widest = lines.iter().map(|l| font.measure_str(l)).max().unwrap_or(0);
    let canvas_w = opts.max_width.unwrap_or(widest).max(1) as u32;
    let line_stride = font.line_height as i32 + opts.line_spacing;
    let canvas_h = (lines.len() as i32 * line_stride).max(1) as u32;
    let mut canvas = pixmap::blank(canvas_w, canvas_h);

    let underline = if opts.mnemonic {
        mnemonic_color(&var.color_name())
    } else {
        None
    };

    for (line_idx, line) in lines.iter().enumerate() {
        let line_y = line_idx as i32 * line_stride;
        let symbols = Symbol::split(line);
        let mut cursor = 0i32;
        for (i, sym) in symbols.iter().enumerate() {
            if i > 0 {
                cursor += font.kerning(&symbols[i - 1], sym);
            }
            let Some(entry) = font.char_for(sym) else {
                continue;
            };
            if let Some(glyph) = var.glyph(font, sym) {
                pixmap::blit_over(
                    &mut canvas,
                    &glyph,
                    cursor + entry.offset.x,
                    line_y + entry.offset.y,
                );
            }
            // First symbol of a mnemonic line gets a 1px underline.
            if i == 0 {
                if let Some(color) = underline {
                    pixmap::fill_rect(
                        &mut canvas,
                        Rect::new(
                            entry.offset.x,
                            line_y + font.base as i32 + 1,
                            entry.x_advance.max(1) as u32,
                            1,
                        ),
                        color,
                    );
                }
            }
            cursor += entry.x_advance;
        }
    }

    let Some(bounds) = pixmap::content_bounds(&canvas) else {
        return Ok(TextRender::blank());
    };
    let cropped = pixmap::crop(&canvas, bounds);
    let baseline = font.base as i32 - bounds.y;

    match &opts.shadow {
        None => Ok(TextRender {
            size: (cropped.width(), cropped.height()),
            image: cropped,
            baseline,
        }),
        Some(spec) => Ok(apply_shadow(cropped, baseline, spec)),
    }
}

/// Composite a blurred shadow mask behind `text_img`.
fn apply_shadow(text_img: RgbaImage, baseline: i32, spec: &ShadowSpec) -> TextRender {
    let mask = pixmap::shadow_mask(
        &text_img,
        Rgba([spec.color[0], spec.color[1], spec.color[2], spec.color[3]]),
        spec.radius,
    );
    let r = spec.radius as i32;
    let (w, h) = (text_img.width() as i32, text_img.height() as i32);

    // Union of the text at the origin and the mask at offset − radius.
    let min_x = 0.min(spec.offset.x - r);
    let min_y = 0.min(spec.offset.y - r);
    let max_x = w.max(spec.offset.x + w + r);
    let max_y = h.max(spec.offset.y + h + r);

    let mut out = pixmap::blank((max_x - min_x) as u32, (max_y - min_y) as u32);
    pixmap::blit_over(&mut out, &mask, spec.offset.x - r - min_x, spec.offset.y - r - min_y);
    pixmap::blit_over(&mut out, &text_img, -min_x, -min_y);

    TextRender {
        size: (out.width(), out.height()),
        // Added top padding shifts the baseline down.
        baseline: baseline - min_y,
        image: out,
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::font::{BitmapFont, FontChar};

    /// Glyphs A/B/? as 8x12 solid blocks on a shared atlas, advance 9,
    /// space advance 4 with an empty rect. Base 11, line height 14.
    fn test_set() -> FontSet {
        let mut chars = Vec::new();
        for (i, c) in ['A', 'B', '?'].into_iter().enumerate() {
            chars.push(FontChar {
                id: Symbol::from(c),
                rect: Rect::new(i as i32 * 10, 0, 8, 12),
                offset: Point::new(0, 0),
                x_advance: 9,
            });
        }
        chars.push(FontChar {
            id: Symbol::from(' '),
            rect: Rect::new(0, 0, 0, 0),
            offset: Point::new(0, 0),
            x_advance: 4,
        });
        let font = Arc::new(BitmapFont::new("T", 12, 14, 11, 30, 12, chars, vec![]));
        let mut atlas = pixmap::blank(30, 12);
        for y in 0..12 {
            for x in 0..28 {
                atlas.put_pixel(x, y, Rgba([10, 10, 10, 255]));
            }
        }
        let mut set = FontSet::new(font);
        set.add_variation("black", atlas);
        set.add_variation("mystery", atlas_copy());
        set
    }

    fn atlas_copy() -> RgbaImage {
        let mut atlas = pixmap::blank(30, 12);
        for y in 0..12 {
            for x in 0..28 {
                atlas.put_pixel(x, y, Rgba([10, 10, 10, 255]));
            }
        }
        atlas
    }

    #[test]
    fn test_draw_reports_cropped_size_and_baseline() {
        let set = test_set();
        let out = draw(&set, "black", "AB", &DrawOptions::default()).unwrap();
        // Glyphs at x 0..8 and 9..17 → tight width 17, height 12.
        assert_eq!(out.size, (17, 12));
        assert_eq!(out.baseline, 11);
        assert!(!out.is_blank());
    }

    #[test]
    fn test_draw_empty_text_blank_sentinel() {
        let set = test_set();
        let out = draw(&set, "black", "", &DrawOptions::default()).unwrap();
        assert!(out.is_blank());
        assert_eq!(out.size, (0, 0));
        assert_eq!(out.baseline, 0);
        assert_eq!((out.image.width(), out.image.height()), (1, 1));
        assert_eq!(out.image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_draw_spaces_only_is_blank() {
        let set = test_set();
        let out = draw(&set, "black", "   ", &DrawOptions::default()).unwrap();
        assert!(out.is_blank());
    }

    #[test]
    fn test_unknown_variation_is_error() {
        let set = test_set();
        let err = draw(&set, "turquoise", "A", &DrawOptions::default());
        assert!(matches!(err, Err(TextError::VariationNotFound(_))));
    }

    #[test]
    fn test_multi_line_height() {
        let set = test_set();
        let opts = DrawOptions {
            max_width: Some(8),
            wrap: WrapMode::Symbol,
            ..Default::default()
        };
        // Width 8 fits one 9-advance glyph per line ("A" then "B").
        let out = draw(&set, "black", "AB", &opts).unwrap();
        // Second line starts at y=14; glyph height 12 → bottom 26.
        assert_eq!(out.size.1, 26);
        assert_eq!(out.size.0, 8);
    }

    #[test]
    fn test_line_spacing_extends_canvas() {
        let set = test_set();
        let opts = DrawOptions {
            max_width: Some(8),
            wrap: WrapMode::Symbol,
            line_spacing: 4,
            ..Default::default()
        };
        let out = draw(&set, "black", "AB", &opts).unwrap();
        assert_eq!(out.size.1, 30);
    }

    #[test]
    fn test_mnemonic_underline_drawn() {
        let set = test_set();
        let opts = DrawOptions {
            mnemonic: true,
            ..Default::default()
        };
        let out = draw(&set, "black", "AB", &opts).unwrap();
        // Underline row sits at base+1 = 12, below the 12px glyphs.
        assert_eq!(out.size.1, 13);
        let p = out.image.get_pixel(0, 12);
        assert_eq!((p[0], p[1], p[2], p[3]), (0, 0, 0, 255));
        // Underline spans only the first symbol's advance.
        assert_eq!(out.image.get_pixel(10, 12)[3], 0);
    }

    #[test]
    fn test_mnemonic_unknown_color_skipped() {
        let set = test_set();
        let opts = DrawOptions {
            mnemonic: true,
            ..Default::default()
        };
        // "mystery" is not in the palette → no underline, normal crop.
        let out = draw(&set, "mystery", "AB", &opts).unwrap();
        assert_eq!(out.size.1, 12);
    }

    #[test]
    fn test_shadow_grows_canvas_and_adjusts_baseline() {
        let set = test_set();
        let opts = DrawOptions {
            shadow: Some(ShadowSpec {
                color: [0, 0, 0, 160],
                offset: Point::new(0, -2),
                radius: 1,
            }),
            ..Default::default()
        };
        let plain = draw(&set, "black", "AB", &DrawOptions::default()).unwrap();
        let out = draw(&set, "black", "AB", &opts).unwrap();
        // Mask extends 3 rows above the text (offset −2, radius 1).
        assert_eq!(out.baseline, plain.baseline + 3);
        assert!(out.size.1 > plain.size.1);
        assert!(out.size.0 > plain.size.0);
    }

    #[test]
    fn test_shadow_behind_text() {
        let set = test_set();
        let opts = DrawOptions {
            shadow: Some(ShadowSpec {
                color: [255, 0, 0, 255],
                offset: Point::new(2, 2),
                radius: 0,
            }),
            ..Default::default()
        };
        let out = draw(&set, "black", "A", &opts).unwrap();
        // Text pixel on top keeps its glyph color where both overlap.
        assert_eq!(out.image.get_pixel(0, 0)[3], 255);
        assert_eq!(out.image.get_pixel(0, 0)[0], 10);
        // Pure shadow area is red.
        let (w, h) = (out.image.width(), out.image.height());
        assert_eq!(out.image.get_pixel(w - 1, h - 1)[0], 255);
    }

    #[test]
    fn test_ellipsis_draw_single_line() {
        let set = test_set();
        let opts = DrawOptions {
            max_width: Some(40),
            truncation: Truncation::Ellipsis,
            ..Default::default()
        };
        // "ABAB" measures 36 and fits; "ABABAB" (54) gets cut.
        let out = draw(&set, "black", "ABABAB", &opts).unwrap();
        assert!(out.size.0 <= 40);
        assert_eq!(out.size.1, 12);
    }

    #[test]
    fn test_unknown_symbols_draw_fallback() {
        let set = test_set();
        let out = draw(&set, "black", "éé", &DrawOptions::default()).unwrap();
        // Falls back to '?' glyphs: same geometry as "AB".
        assert_eq!(out.size, (17, 12));
    }
}
