//! Content compositor — icon plus wrapped body text over an optional
//! tiled backdrop.

use image::RgbaImage;
use retrobox_assets::{style, AssetManager, StyleId};
use retrobox_core::pixmap;
use retrobox_text::layout::{self, Truncation, WrapMode};
use retrobox_text::{draw, DrawOptions};

use crate::config::DialogConfig;
use crate::error::RenderError;

/// Width the content area wants before wrapping: chrome plus the
/// widest unwrapped line of the body.
pub fn natural_width(
    assets: &AssetManager,
    style_id: StyleId,
    cfg: &DialogConfig,
) -> Result<u32, RenderError> {
    let m = style::definition(style_id).metrics;
    let mut width = 2 * m.content_padding;
    if cfg.icon.is_some() {
        width += m.icon_size.0 + m.icon_text_gap;
    }
    if !cfg.content.is_empty() {
        let set = assets.font_set(m.content_font.font)?;
        let lines = layout::wrap(
            set.font(),
            &cfg.content,
            i32::MAX,
            WrapMode::Word,
            Truncation::None,
        );
        let widest = lines
            .iter()
            .map(|l| set.font().measure_str(l))
            .max()
            .unwrap_or(0);
        width += widest.max(0) as u32;
    }
    Ok(width)
}

/// Render the content area at its final width.
pub fn render_content(
    assets: &AssetManager,
    style_id: StyleId,
    cfg: &DialogConfig,
    inner_width: u32,
) -> Result<RgbaImage, RenderError> {
    let m = style::definition(style_id).metrics;
    let pad = m.content_padding;

    let icon = match cfg.icon {
        Some(id) => Some(assets.icon(style_id, id, cfg.icon_policy)?),
        None => None,
    };

    let text_x = match &icon {
        Some(icon) => pad + icon.image.width() + m.icon_text_gap,
        None => pad,
    };
    let avail = inner_width.saturating_sub(text_x + pad).max(1);

    let selector = &m.content_font;
    let set = assets.font_set(selector.font)?;
    let text = draw(
        &set,
        selector.variation,
        &cfg.content,
        &DrawOptions {
            max_width: Some(avail as i32),
            wrap: WrapMode::Word,
            ..Default::default()
        },
    )?;

    let icon_bottom = icon.as_ref().map_or(0, |i| pad + i.image.height());
    let text_bottom = if text.is_blank() { 0 } else { pad + text.size.1 };
    let height = (icon_bottom.max(text_bottom) + pad).max(m.content_min_height);

    let mut area = match assets.content_background(style_id)? {
        Some(bg) => pixmap::tile_xy(&bg, inner_width, height),
        None => pixmap::blank(inner_width, height),
    };
    if let Some(icon) = &icon {
        pixmap::blit_over(&mut area, &icon.image, pad as i32, pad as i32);
    }
    if !text.is_blank() {
        pixmap::blit_over(&mut area, &text.image, text_x as i32, pad as i32);
    }
    Ok(area)
}
