//! Button compositor — cap/center/cap assembly plus the button row.
//!
//! A button is three sprites: fixed caps on both ends and a center
//! piece stretched or tiled to cover the label. Width is the label
//! plus horizontal padding, floored at the style's minimum, so a bare
//! "OK" still renders a grabbable control. Disabled buttons reuse the
//! same pipeline with the label grayscaled.

use image::RgbaImage;
use retrobox_assets::{style, AssetManager, ButtonKind, FillMode, StyleId};
use retrobox_core::pixmap;
use retrobox_text::{draw, DrawOptions};

use crate::config::{Alignment, ButtonConfig};
use crate::error::RenderError;

pub struct RenderedButton {
    pub image: RgbaImage,
    pub kind: ButtonKind,
}

/// Render every requested button, in row order.
///
/// With `sorted` the row is reordered by the style's preferred kind
/// order; the sort is stable, so buttons of the same kind keep their
/// request order.
pub fn render_buttons(
    assets: &AssetManager,
    style_id: StyleId,
    buttons: &[ButtonConfig],
    sorted: bool,
) -> Result<Vec<RenderedButton>, RenderError> {
    let order = style::definition(style_id).metrics.button_order;
    let mut indices: Vec<usize> = (0..buttons.len()).collect();
    if sorted {
        indices.sort_by_key(|&i| kind_rank(&order, buttons[i].kind));
    }
    indices
        .into_iter()
        .map(|i| render_button(assets, style_id, &buttons[i]))
        .collect()
}

/// Position of `kind` in the style's preferred order; unknown kinds
/// sink to the end.
pub(crate) fn kind_rank(order: &[ButtonKind; 3], kind: ButtonKind) -> usize {
    order.iter().position(|k| *k == kind).unwrap_or(order.len())
}

/// Render one button.
pub fn render_button(
    assets: &AssetManager,
    style_id: StyleId,
    cfg: &ButtonConfig,
) -> Result<RenderedButton, RenderError> {
    let def = style::definition(style_id);
    let metrics = def.metrics.button_metrics(cfg.kind);
    let sprites = assets.button_sprites(style_id, cfg.kind)?;
    let selector = &def.metrics.button_font;

    let set = assets.font_set(selector.font)?;
    let opts = DrawOptions {
        mnemonic: cfg.mnemonic,
        ..Default::default()
    };
    let mut label = draw(&set, selector.variation, &cfg.text, &opts)?;
    if cfg.kind == ButtonKind::Disabled {
        pixmap::grayscale_in_place(&mut label.image);
    }

    let text_w = label.size.0;
    let width = (text_w + 2 * metrics.h_padding).max(metrics.min_width);
    let height = sprites.left.height();
    let mut img = pixmap::blank(width, height);

    let caps_w = sprites.left.width() + sprites.right.width();
    let center_w = width.saturating_sub(caps_w).max(1);
    let center = match def.metrics.button_fill {
        FillMode::Stretch => pixmap::stretch(&sprites.center, center_w, height),
        FillMode::Tile => pixmap::tile_xy(&sprites.center, center_w, height),
    };
    pixmap::blit_over(&mut img, &center, sprites.left.width() as i32, 0);
    pixmap::blit_over(&mut img, &sprites.left, 0, 0);
    pixmap::blit_over(
        &mut img,
        &sprites.right,
        width as i32 - sprites.right.width() as i32,
        0,
    );

    if !label.is_blank() {
        let x = (width as i32 - label.size.0 as i32) / 2;
        // Label baseline pinned to the midline plus the kind offset.
        let y = height as i32 / 2 + metrics.baseline_offset - label.baseline;
        pixmap::blit_over(&mut img, &label.image, x, y);
    }

    Ok(RenderedButton {
        image: img,
        kind: cfg.kind,
    })
}

/// Width the button row wants before any clamping.
pub fn natural_row_width(style_id: StyleId, buttons: &[RenderedButton]) -> u32 {
    if buttons.is_empty() {
        return 0;
    }
    let m = &style::definition(style_id).metrics;
    let total: u32 = buttons.iter().map(|b| b.image.width()).sum();
    total + m.button_spacing * (buttons.len() as u32 - 1) + 2 * m.button_area_padding
}

/// Assemble the button row.
///
/// With a backdrop sprite the row spans the full `width` and the
/// buttons are placed inside it per `align`. Without one the row is a
/// tight canvas around just the buttons and the caller positions it.
pub fn assemble_row(
    assets: &AssetManager,
    style_id: StyleId,
    buttons: &[RenderedButton],
    align: Alignment,
    width: u32,
) -> Result<RgbaImage, RenderError> {
    let m = &style::definition(style_id).metrics;
    let button_h = buttons.iter().map(|b| b.image.height()).max().unwrap_or(0);
    let height = button_h + 2 * m.button_area_padding;

    let content_w: u32 = buttons.iter().map(|b| b.image.width()).sum::<u32>()
        + m.button_spacing * buttons.len().saturating_sub(1) as u32;
    let (mut row, start_x) = match assets.button_area_background(style_id)? {
        Some(bg) => {
            let row = pixmap::tile_xy(&bg, width, height);
            (row, row_x_offset(align, width, content_w, m.button_area_padding))
        }
        None => (pixmap::blank(content_w, height), 0),
    };

    let mut x = start_x;
    for button in buttons {
        // Buttons of differing heights sit on a common bottom edge.
        let y = m.button_area_padding as i32 + (button_h as i32 - button.image.height() as i32);
        pixmap::blit_over(&mut row, &button.image, x, y);
        x += button.image.width() as i32 + m.button_spacing as i32;
    }
    Ok(row)
}

pub(crate) fn row_x_offset(align: Alignment, row_w: u32, content_w: u32, padding: u32) -> i32 {
    match align {
        Alignment::Left => padding as i32,
        Alignment::Center => (row_w as i32 - content_w as i32) / 2,
        Alignment::Right => row_w as i32 - content_w as i32 - padding as i32,
    }
}

// ===================================================================
// Tests
// ===================================================================
