//! Dialog orchestration — sizing negotiation and final assembly.
//!
//! Sizing is a two-step negotiation: every part first reports the
//! width it would take unconstrained, then the widest request (floored
//! at the style minimum, capped by the configured maximum minus the
//! border) becomes the common inner width every part is re-rendered
//! at. The framed result is deterministic for a given config and asset
//! root.

use std::time::{Duration, Instant};

use image::RgbaImage;
use retrobox_assets::{style, AssetManager};
use retrobox_core::pixmap;

use crate::button;
use crate::config::DialogConfig;
use crate::content;
use crate::error::RenderError;
use crate::frame;

/// Per-stage timings of one render.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderStats {
    pub content: Duration,
    pub buttons: Duration,
    pub frame: Duration,
    pub total: Duration,
}

#[derive(Debug)]
pub struct RenderedDialog {
    pub image: RgbaImage,
    pub stats: RenderStats,
}

/// Render one dialog from its validated config.
pub fn render_dialog(
    assets: &AssetManager,
    cfg: &DialogConfig,
) -> Result<RenderedDialog, RenderError> {
    cfg.validate()?;
    let total_start = Instant::now();
    let m = style::definition(cfg.style).metrics;
    let mut stats = RenderStats::default();

    // Buttons render once at natural size; the row is assembled later.
    let t = Instant::now();
    let buttons = button::render_buttons(assets, cfg.style, &cfg.buttons, cfg.sort_buttons)?;
    stats.buttons += t.elapsed();

    let t = Instant::now();
    let content_nat = content::natural_width(assets, cfg.style, cfg)?;
    stats.content += t.elapsed();
    let row_nat = button::natural_row_width(cfg.style, &buttons);

    let mut inner_w = content_nat.max(row_nat).max(m.min_inner_width);
    if let Some(max) = cfg.max_width {
        let sprites = assets.frame_sprites(cfg.style)?;
        let border = sprites.left.width() + sprites.right.width();
        inner_w = inner_w.min(max.saturating_sub(border).max(m.min_inner_width));
    }

    let t = Instant::now();
    let content_img = content::render_content(assets, cfg.style, cfg, inner_w)?;
    stats.content += t.elapsed();

    let row_img = if buttons.is_empty() {
        None
    } else {
        let t = Instant::now();
        let row = button::assemble_row(assets, cfg.style, &buttons, cfg.button_align, inner_w)?;
        stats.buttons += t.elapsed();
        Some(row)
    };

    let inner_h = content_img.height() + row_img.as_ref().map_or(0, RgbaImage::height);
    let mut inner = pixmap::blank(inner_w, inner_h);
    pixmap::blit_over(&mut inner, &content_img, 0, 0);
    if let Some(row) = &row_img {
        // A tight (backdrop-less) row is positioned here; a full-width
        // row already placed its buttons.
        let x = if row.width() < inner_w {
            button::row_x_offset(cfg.button_align, inner_w, row.width(), m.button_area_padding)
        } else {
            0
        };
        pixmap::blit_over(&mut inner, row, x, content_img.height() as i32);
    }

    let t = Instant::now();
    let image = frame::render_frame(assets, cfg.style, &cfg.title, cfg.close_enabled, &inner)?;
    stats.frame = t.elapsed();
    stats.total = total_start.elapsed();

    log::info!(
        "rendered {} dialog {}x{} with {} buttons ({:.1}ms)",
        cfg.style.slug(),
        image.width(),
        image.height(),
        buttons.len(),
        stats.total.as_secs_f64() * 1000.0,
    );

    Ok(RenderedDialog { image, stats })
}
