//! Frame compositor — nine-slice border, title bar text, and the close
//! control.
//!
//! The border is eight sprites: four fixed corners and four strips
//! stretched or tiled (per style) to span the gaps between them. The
//! top strip doubles as the title bar; title text is ellipsis-truncated
//! against the span left over after the close control's reservation and
//! vertically centered in the strip.

use image::RgbaImage;
use retrobox_assets::{style, AssetManager, CloseAnchor, FillMode, StyleId};
use retrobox_core::pixmap;
use retrobox_text::layout::Truncation;
use retrobox_text::{draw, DrawOptions};

use crate::error::RenderError;

/// Gap between a title-bar edge and the title text.
const TITLE_INSET: u32 = 4;

fn fill_h(mode: FillMode, sprite: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    match mode {
        FillMode::Stretch => pixmap::stretch(sprite, width, height),
        FillMode::Tile => pixmap::tile_xy(sprite, width, height),
    }
}

/// Wrap `inner` in the style's frame.
pub fn render_frame(
    assets: &AssetManager,
    style_id: StyleId,
    title: &str,
    close_enabled: bool,
    inner: &RgbaImage,
) -> Result<RgbaImage, RenderError> {
    let def = style::definition(style_id);
    let m = &def.metrics;
    let sprites = assets.frame_sprites(style_id)?;

    let (left_w, right_w) = (sprites.left.width(), sprites.right.width());
    let (top_h, bottom_h) = (sprites.top.height(), sprites.bottom.height());
    let total_w = left_w + inner.width() + right_w;
    let total_h = top_h + inner.height() + bottom_h;
    let mut out = pixmap::blank(total_w, total_h);

    // Strips between the corners.
    let top_span = total_w.saturating_sub(sprites.top_left.width() + sprites.top_right.width());
    let strip = fill_h(m.frame_fill, &sprites.top, top_span, top_h);
    pixmap::blit_over(&mut out, &strip, sprites.top_left.width() as i32, 0);

    let bottom_span =
        total_w.saturating_sub(sprites.bottom_left.width() + sprites.bottom_right.width());
    let strip = fill_h(m.frame_fill, &sprites.bottom, bottom_span, bottom_h);
    pixmap::blit_over(
        &mut out,
        &strip,
        sprites.bottom_left.width() as i32,
        total_h as i32 - bottom_h as i32,
    );

    let left_span =
        total_h.saturating_sub(sprites.top_left.height() + sprites.bottom_left.height());
    let edge = fill_h(m.frame_fill, &sprites.left, left_w, left_span);
    pixmap::blit_over(&mut out, &edge, 0, sprites.top_left.height() as i32);

    let right_span =
        total_h.saturating_sub(sprites.top_right.height() + sprites.bottom_right.height());
    let edge = fill_h(m.frame_fill, &sprites.right, right_w, right_span);
    pixmap::blit_over(
        &mut out,
        &edge,
        total_w as i32 - right_w as i32,
        sprites.top_right.height() as i32,
    );

    // Corners over the strip ends.
    pixmap::blit_over(&mut out, &sprites.top_left, 0, 0);
    pixmap::blit_over(
        &mut out,
        &sprites.top_right,
        total_w as i32 - sprites.top_right.width() as i32,
        0,
    );
    pixmap::blit_over(
        &mut out,
        &sprites.bottom_left,
        0,
        total_h as i32 - sprites.bottom_left.height() as i32,
    );
    pixmap::blit_over(
        &mut out,
        &sprites.bottom_right,
        total_w as i32 - sprites.bottom_right.width() as i32,
        total_h as i32 - sprites.bottom_right.height() as i32,
    );

    pixmap::blit_over(&mut out, inner, left_w as i32, top_h as i32);

    // Close control reservation eats into the title span on its side.
    let close_sprite = if close_enabled {
        sprites.close.as_ref()
    } else {
        sprites.close_disabled.as_ref()
    };
    let close_reservation = close_sprite.map_or(0, |s| {
        s.width() + m.close_offset.x.unsigned_abs() + TITLE_INSET
    });

    if !title.trim().is_empty() {
        let selector = &m.title_font;
        let set = assets.font_set(selector.font)?;
        let avail = top_span
            .saturating_sub(2 * TITLE_INSET + close_reservation)
            .max(1);
        let render = draw(
            &set,
            selector.variation,
            title,
            &DrawOptions {
                max_width: Some(avail as i32),
                truncation: Truncation::Ellipsis,
                shadow: m.title_shadow,
                ..Default::default()
            },
        )?;
        if !render.is_blank() {
            let x = match m.close_anchor {
                // Title shifts right past a leading close control.
                CloseAnchor::TopLeft => {
                    sprites.top_left.width() + TITLE_INSET + close_reservation
                }
                _ => sprites.top_left.width() + TITLE_INSET,
            };
            let y = (top_h as i32 - render.size.1 as i32) / 2;
            pixmap::blit_over(&mut out, &render.image, x as i32, y);
        }
    }

    if let Some(sprite) = close_sprite {
        let x = match m.close_anchor {
            CloseAnchor::TopLeft => m.close_offset.x,
            CloseAnchor::TopCenter => (total_w as i32 - sprite.width() as i32) / 2 + m.close_offset.x,
            CloseAnchor::TopRight => total_w as i32 - sprite.width() as i32 + m.close_offset.x,
        };
        pixmap::blit_over(&mut out, sprite, x, m.close_offset.y);
    }

    Ok(out)
}
