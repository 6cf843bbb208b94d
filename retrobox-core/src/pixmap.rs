//! Deterministic CPU-side pixel-buffer operations.
//!
//! All compositing in retrobox happens through the helpers in this
//! module over `image::RgbaImage` (straight alpha, 8 bits per channel).
//! There is no GPU, no SIMD, no floating-point blending — every
//! operation is integer arithmetic so identical inputs always produce
//! byte-identical outputs.
//!
//! Ownership rule: every function here either mutates the destination
//! in place or returns a freshly allocated buffer. Cached sub-images
//! elsewhere in the system are shared via `Arc` and never handed out
//! mutably.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::geom::Rect;

#[derive(Error, Debug)]
pub enum PixmapError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully transparent canvas.
pub fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width.max(1), height.max(1))
}

/// A canvas filled with one color.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width.max(1), height.max(1), color)
}

/// Source-over blit of `src` onto `dst` at `(x, y)`, clipped to `dst`.
///
/// Straight-alpha blending in integer arithmetic:
/// `out_a = sa + da·(255−sa)/255`, channels weighted accordingly.
pub fn blit_over(dst: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (dw, dh) = (dst.width() as i32, dst.height() as i32);
    for (sx, sy, sp) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= dw || dy >= dh {
            continue;
        }
        let sa = sp[3] as u32;
        if sa == 0 {
            continue;
        }
        let dp = dst.get_pixel_mut(dx as u32, dy as u32);
        if sa == 255 {
            *dp = *sp;
            continue;
        }
        let da = dp[3] as u32;
        let inv = 255 - sa;
        let out_a = sa + da * inv / 255;
        if out_a == 0 {
            *dp = Rgba([0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            let s = sp[c] as u32;
            let d = dp[c] as u32;
            dp[c] = ((s * sa + d * da * inv / 255) / out_a) as u8;
        }
        dp[3] = out_a as u8;
    }
}

/// Fill a rectangle with one color (no blending), clipped to `dst`.
pub fn fill_rect(dst: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (dw, dh) = (dst.width() as i32, dst.height() as i32);
    for ry in rect.y..rect.bottom() {
        for rx in rect.x..rect.right() {
            if rx < 0 || ry < 0 || rx >= dw || ry >= dh {
                continue;
            }
            dst.put_pixel(rx as u32, ry as u32, color);
        }
    }
}

/// Repeat `sprite` horizontally until `width` is covered (last repeat
/// clipped). Height is the sprite's height.
pub fn tile_x(sprite: &RgbaImage, width: u32) -> RgbaImage {
    tile_xy(sprite, width, sprite.height())
}

/// Repeat `sprite` in both axes until `width × height` is covered.
pub fn tile_xy(sprite: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut out = blank(width, height);
    if sprite.width() == 0 || sprite.height() == 0 {
        return out;
    }
    let mut y = 0i32;
    while y < height as i32 {
        let mut x = 0i32;
        while x < width as i32 {
            blit_over(&mut out, sprite, x, y);
            x += sprite.width() as i32;
        }
        y += sprite.height() as i32;
    }
    out
}

/// Nearest-neighbour resize. Bitmap sprites must keep hard pixel edges,
/// so no filtering is ever applied.
pub fn stretch(sprite: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(
        sprite,
        width.max(1),
        height.max(1),
        image::imageops::FilterType::Nearest,
    )
}

/// Tight bounding box of all pixels with non-zero alpha, or `None` for
/// a fully transparent image.
pub fn content_bounds(img: &RgbaImage) -> Option<Rect> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;
    for (x, y, p) in img.enumerate_pixels() {
        if p[3] != 0 {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if !any {
        return None;
    }
    Some(Rect::new(
        min_x as i32,
        min_y as i32,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}

/// Copy a sub-rectangle into a new buffer. The rect must lie inside the
/// image (callers pass rects produced by [`content_bounds`] or parsed
/// font metrics, both already validated).
pub fn crop(img: &RgbaImage, rect: Rect) -> RgbaImage {
    image::imageops::crop_imm(img, rect.x.max(0) as u32, rect.y.max(0) as u32, rect.w, rect.h)
        .to_image()
}

/// Convert to grayscale in place, preserving alpha (ITU-R BT.601 luma).
pub fn grayscale_in_place(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let luma =
            (299 * p[0] as u32 + 587 * p[1] as u32 + 114 * p[2] as u32) / 1000;
        p[0] = luma as u8;
        p[1] = luma as u8;
        p[2] = luma as u8;
    }
}

/// Build a blurred, recolored alpha mask of `src` for drop shadows.
///
/// The output has `src`'s dimensions plus `radius` on every side; its
/// RGB is `color`, its alpha is the box-blurred alpha of `src` scaled by
/// `color`'s alpha. This is the "destination-in onto a solid layer"
/// step of the shadow pass.
pub fn shadow_mask(src: &RgbaImage, color: Rgba<u8>, radius: u32) -> RgbaImage {
    let pad = radius as i32;
    let w = src.width() + 2 * radius;
    let h = src.height() + 2 * radius;

    // Alpha plane, padded.
    let mut alpha = vec![0u16; (w * h) as usize];
    for (x, y, p) in src.enumerate_pixels() {
        let idx = ((y as i32 + pad) * w as i32 + x as i32 + pad) as usize;
        alpha[idx] = p[3] as u16;
    }

    // Separable box blur, one pass per axis.
    if radius > 0 {
        alpha = box_blur_axis(&alpha, w, h, radius, true);
        alpha = box_blur_axis(&alpha, w, h, radius, false);
    }

    let mut out = blank(w, h);
    let scale = color[3] as u32;
    for (x, y, p) in out.enumerate_pixels_mut() {
        let a = alpha[(y * w + x) as usize] as u32 * scale / 255;
        *p = Rgba([color[0], color[1], color[2], a.min(255) as u8]);
    }
    out
}

fn box_blur_axis(src: &[u16], w: u32, h: u32, radius: u32, horizontal: bool) -> Vec<u16> {
    let mut out = vec![0u16; src.len()];
    let r = radius as i32;
    let window = (2 * r + 1) as u32;
    let (outer, inner) = if horizontal { (h, w) } else { (w, h) };
    for o in 0..outer as i32 {
        for i in 0..inner as i32 {
            let mut sum = 0u32;
            for k in -r..=r {
                let j = (i + k).clamp(0, inner as i32 - 1);
                let idx = if horizontal {
                    (o * w as i32 + j) as usize
                } else {
                    (j * w as i32 + o) as usize
                };
                sum += src[idx] as u32;
            }
            let idx = if horizontal {
                (o * w as i32 + i) as usize
            } else {
                (i * w as i32 + o) as usize
            };
            out[idx] = (sum / window) as u16;
        }
    }
    out
}

// ── PNG IO ──────────────────────────────────────────────────────────

/// Encode an image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, PixmapError> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decode PNG bytes into an RGBA image.
pub fn decode_png(bytes: &[u8]) -> Result<RgbaImage, PixmapError> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(img.to_rgba8())
}

/// Load a PNG file from disk.
pub fn load_png(path: &Path) -> Result<RgbaImage, PixmapError> {
    let bytes = std::fs::read(path)?;
    let img = decode_png(&bytes)?;
    log::debug!(
        "decoded {} ({}x{}, {} bytes)",
        path.display(),
        img.width(),
        img.height(),
        bytes.len(),
    );
    Ok(img)
}

/// Write an image to disk as PNG.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), PixmapError> {
    let bytes = encode_png(img)?;
    std::fs::write(path, &bytes)?;
    log::debug!(
        "wrote {} ({}x{}, {} bytes)",
        path.display(),
        img.width(),
        img.height(),
        bytes.len(),
    );
    Ok(())
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_blank_is_transparent() {
        let img = blank(4, 4);
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_blank_never_zero_sized() {
        let img = blank(0, 0);
        assert_eq!((img.width(), img.height()), (1, 1));
    }

    #[test]
    fn test_blit_opaque_replaces() {
        let mut dst = solid(4, 4, BLUE);
        let src = solid(2, 2, RED);
        blit_over(&mut dst, &src, 1, 1);
        assert_eq!(*dst.get_pixel(1, 1), RED);
        assert_eq!(*dst.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_blit_clips_outside() {
        let mut dst = blank(4, 4);
        let src = solid(4, 4, RED);
        blit_over(&mut dst, &src, -2, -2);
        assert_eq!(*dst.get_pixel(0, 0), RED);
        assert_eq!(dst.get_pixel(3, 3)[3], 0);
    }

    #[test]
    fn test_blit_transparent_source_is_noop() {
        let mut dst = solid(2, 2, BLUE);
        let src = blank(2, 2);
        blit_over(&mut dst, &src, 0, 0);
        assert_eq!(*dst.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_blit_half_alpha_blends() {
        let mut dst = solid(1, 1, Rgba([0, 0, 0, 255]));
        let src = solid(1, 1, Rgba([255, 255, 255, 128]));
        blit_over(&mut dst, &src, 0, 0);
        let p = dst.get_pixel(0, 0);
        // Roughly half white over black.
        assert!(p[0] > 120 && p[0] < 135, "got {}", p[0]);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut dst = blank(4, 4);
        fill_rect(&mut dst, Rect::new(2, 2, 10, 10), RED);
        assert_eq!(*dst.get_pixel(2, 2), RED);
        assert_eq!(*dst.get_pixel(3, 3), RED);
        assert_eq!(dst.get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_tile_x_covers_width() {
        let sprite = solid(3, 2, RED);
        let out = tile_x(&sprite, 8);
        assert_eq!((out.width(), out.height()), (8, 2));
        assert!(out.pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_tile_xy_covers_both_axes() {
        let sprite = solid(3, 3, BLUE);
        let out = tile_xy(&sprite, 7, 5);
        assert_eq!((out.width(), out.height()), (7, 5));
        assert!(out.pixels().all(|p| *p == BLUE));
    }

    #[test]
    fn test_stretch_nearest_keeps_colors() {
        let mut sprite = blank(2, 1);
        sprite.put_pixel(0, 0, RED);
        sprite.put_pixel(1, 0, BLUE);
        let out = stretch(&sprite, 4, 2);
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(3, 1), BLUE);
        // Nearest-neighbour: no intermediate colors.
        assert!(out.pixels().all(|p| *p == RED || *p == BLUE));
    }

    #[test]
    fn test_content_bounds_tight() {
        let mut img = blank(10, 10);
        img.put_pixel(3, 4, RED);
        img.put_pixel(6, 7, BLUE);
        let b = content_bounds(&img).unwrap();
        assert_eq!(b, Rect::new(3, 4, 4, 4));
    }

    #[test]
    fn test_content_bounds_blank_is_none() {
        assert!(content_bounds(&blank(5, 5)).is_none());
    }

    #[test]
    fn test_crop_matches_bounds() {
        let mut img = blank(10, 10);
        img.put_pixel(2, 2, RED);
        let b = content_bounds(&img).unwrap();
        let cut = crop(&img, b);
        assert_eq!((cut.width(), cut.height()), (1, 1));
        assert_eq!(*cut.get_pixel(0, 0), RED);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let mut img = solid(2, 2, Rgba([200, 50, 50, 180]));
        grayscale_in_place(&mut img);
        let p = img.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[3], 180);
    }

    #[test]
    fn test_shadow_mask_dimensions_and_color() {
        let src = solid(4, 4, RED);
        let mask = shadow_mask(&src, Rgba([0, 0, 0, 255]), 2);
        assert_eq!((mask.width(), mask.height()), (8, 8));
        // Center should be dark and opaque-ish; corner faded.
        let center = mask.get_pixel(4, 4);
        let corner = mask.get_pixel(0, 0);
        assert_eq!(center[0], 0);
        assert!(center[3] > corner[3]);
    }

    #[test]
    fn test_shadow_mask_zero_radius_is_recolor() {
        let src = solid(2, 2, RED);
        let mask = shadow_mask(&src, Rgba([0, 0, 0, 128]), 0);
        assert_eq!((mask.width(), mask.height()), (2, 2));
        assert_eq!(mask.get_pixel(0, 0)[3], 128);
    }

    #[test]
    fn test_png_round_trip() {
        let mut img = blank(3, 3);
        img.put_pixel(1, 1, RED);
        let bytes = encode_png(&img).unwrap();
        let back = decode_png(&bytes).unwrap();
        assert_eq!(img, back);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_png(b"not a png").is_err());
    }
}
