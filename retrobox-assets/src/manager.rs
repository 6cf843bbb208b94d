//! Asset manager — resolution walk plus concurrent decode caches.
//!
//! ## Resolution
//!
//! A lookup for `(style, key)` walks the resource trie in a fixed
//! order until a terminal resource is found:
//!
//! ```text
//! styles/{style}/themes/{requested theme}/{key}
//! styles/{style}/themes/{style's default theme}/{key}
//! styles/{style}/themes/common/{key}
//! ── repeat for the style's alias parent, keeping the requested theme ──
//! ```
//!
//! The requested theme is pinned to the *original* style's default
//! theme for the whole walk, which is what lets the olive colorway find
//! olive-themed assets inside its alias parent's directory.
//!
//! ## Caching
//!
//! Decoded images, parsed font sets, and scaled icons live in `DashMap`
//! caches keyed by path (images) or semantic key (fonts, icons), so
//! concurrent renders share decodes without a global lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use image::RgbaImage;
use retrobox_core::{pixmap, PixmapError};
use retrobox_text::{bmfont, FontError, FontSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::style::{self, StyleId};
use crate::tree::ResourceTree;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A sprite group could not be fully resolved. Lists every id the
    /// group needs and the subset that was not found, so a bundling
    /// defect reads out of one log line.
    #[error("style {style} is missing assets: expected {expected:?}, missing {missing:?}")]
    MissingAssets {
        style: String,
        expected: Vec<String>,
        missing: Vec<String>,
    },

    #[error("icon {id} not found for style {style}")]
    IconNotFound { style: String, id: u32 },

    #[error("font {0:?} not found")]
    FontNotFound(String),

    #[error(transparent)]
    Pixmap(#[from] PixmapError),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("asset io: {0}")]
    Io(#[from] std::io::Error),
}

// ── Sprite groups ───────────────────────────────────────────────────

/// The nine-slice border sprites of a dialog frame, plus the close
/// control pair when the style draws one.
#[derive(Debug)]
pub struct FrameSprites {
    pub top_left: Arc<RgbaImage>,
    pub top: Arc<RgbaImage>,
    pub top_right: Arc<RgbaImage>,
    pub left: Arc<RgbaImage>,
    pub right: Arc<RgbaImage>,
    pub bottom_left: Arc<RgbaImage>,
    pub bottom: Arc<RgbaImage>,
    pub bottom_right: Arc<RgbaImage>,
    pub close: Option<Arc<RgbaImage>>,
    pub close_disabled: Option<Arc<RgbaImage>>,
}

/// Cap-center-cap sprites for one button kind.
#[derive(Debug)]
pub struct ButtonSprites {
    pub left: Arc<RgbaImage>,
    pub center: Arc<RgbaImage>,
    pub right: Arc<RgbaImage>,
}

/// Behavior when a requested icon id is absent from the style's set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconPolicy {
    /// Fail the render.
    #[default]
    Fail,
    /// Substitute a neutral placeholder box.
    Placeholder,
}

/// Sentinel id recorded on substituted placeholder icons.
pub const PLACEHOLDER_ICON_ID: u32 = u32::MAX;

/// A resolved icon bitmap, scaled to the style's icon size.
#[derive(Debug)]
pub struct IconImage {
    pub image: Arc<RgbaImage>,
    /// Requested id, or [`PLACEHOLDER_ICON_ID`] after substitution.
    pub id: u32,
}

impl IconImage {
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ICON_ID
    }
}

/// Entries of one `.iconset` directory, indexed once at startup.
struct IconSet {
    entries: FxHashMap<u32, PathBuf>,
}

// ── Manager ─────────────────────────────────────────────────────────

pub struct AssetManager {
    tree: ResourceTree,
    images: DashMap<PathBuf, Arc<RgbaImage>>,
    fonts: DashMap<String, Arc<FontSet>>,
    icons: DashMap<String, Arc<RgbaImage>>,
    icon_sets: FxHashMap<StyleId, IconSet>,
}

impl AssetManager {
    /// Scan `root` and build a manager over it.
    pub fn open(root: &Path) -> Result<AssetManager, AssetError> {
        let tree = ResourceTree::scan(root)?;
        Ok(AssetManager::with_tree(tree))
    }

    /// Build a manager over an already-built trie.
    pub fn with_tree(tree: ResourceTree) -> AssetManager {
        let start = Instant::now();
        let mut icon_sets = FxHashMap::default();
        for id in StyleId::ALL {
            if let Some(dir) = tree.get(&["styles", id.slug(), "icons"]) {
                match index_icon_set(dir) {
                    Ok(set) => {
                        log::info!("{}: {} icons", id.slug(), set.entries.len());
                        icon_sets.insert(id, set);
                    }
                    Err(err) => {
                        log::warn!("cannot index icon set for {}: {err}", id.slug());
                    }
                }
            }
        }
        log::info!(
            "asset manager ready: {} resources, {} icon sets ({:.1}ms)",
            tree.len(),
            icon_sets.len(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        AssetManager {
            tree,
            images: DashMap::new(),
            fonts: DashMap::new(),
            icons: DashMap::new(),
            icon_sets,
        }
    }

    // ── Resolution ──────────────────────────────────────────────────

    /// Resolve `key` for `style` through the theme/alias walk.
    pub fn resolve(&self, style: StyleId, key: &[&str]) -> Option<&Path> {
        let requested_theme = style::definition(style).default_theme;
        let mut cursor = Some(style);
        while let Some(current) = cursor {
            let def = style::definition(current);
            let slug = current.slug();
            let mut themes = vec![requested_theme];
            if def.default_theme != requested_theme {
                themes.push(def.default_theme);
            }
            themes.push("common");
            for theme in themes {
                let mut segments = vec!["styles", slug, "themes", theme];
                segments.extend_from_slice(key);
                if let Some(path) = self.tree.get(&segments) {
                    return Some(path);
                }
            }
            cursor = def.alias;
        }
        None
    }

    /// Resolve a group of keys at once; a single error enumerates the
    /// whole group and every miss.
    fn resolve_group(
        &self,
        style: StyleId,
        keys: &[&[&str]],
    ) -> Result<Vec<&Path>, AssetError> {
        let mut found = Vec::with_capacity(keys.len());
        let mut missing = Vec::new();
        for key in keys {
            match self.resolve(style, key) {
                Some(path) => found.push(path),
                None => missing.push(key.join("/")),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(AssetError::MissingAssets {
                style: style.slug().to_owned(),
                expected: keys.iter().map(|k| k.join("/")).collect(),
                missing,
            })
        }
    }

    // ── Images ──────────────────────────────────────────────────────

    /// Decode (or fetch the cached decode of) the image at `path`.
    pub fn image(&self, path: &Path) -> Result<Arc<RgbaImage>, AssetError> {
        if let Some(hit) = self.images.get(path) {
            return Ok(Arc::clone(&hit));
        }
        let decoded = Arc::new(pixmap::load_png(path)?);
        self.images
            .insert(path.to_path_buf(), Arc::clone(&decoded));
        Ok(decoded)
    }

    fn resolved_image(&self, style: StyleId, key: &[&str]) -> Result<Option<Arc<RgbaImage>>, AssetError> {
        match self.resolve(style, key) {
            Some(path) => {
                let path = path.to_path_buf();
                Ok(Some(self.image(&path)?))
            }
            None => Ok(None),
        }
    }

    /// The frame's border sprites. All eight borders are required; the
    /// close pair is required exactly when the style has a close
    /// control.
    pub fn frame_sprites(&self, style: StyleId) -> Result<FrameSprites, AssetError> {
        let mut keys: Vec<&[&str]> = vec![
            &["frame", "top_left"],
            &["frame", "top"],
            &["frame", "top_right"],
            &["frame", "left"],
            &["frame", "right"],
            &["frame", "bottom_left"],
            &["frame", "bottom"],
            &["frame", "bottom_right"],
        ];
        let has_close = style::definition(style).caps.has_close;
        if has_close {
            keys.push(&["frame", "close"]);
            keys.push(&["frame", "close_disabled"]);
        }
        let paths: Vec<PathBuf> = self
            .resolve_group(style, &keys)?
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        let mut sprites = Vec::with_capacity(paths.len());
        for path in &paths {
            sprites.push(self.image(path)?);
        }
        let mut it = sprites.into_iter();
        // resolve_group preserves key order.
        Ok(FrameSprites {
            top_left: it.next().ok_or_else(|| missing_internal(style))?,
            top: it.next().ok_or_else(|| missing_internal(style))?,
            top_right: it.next().ok_or_else(|| missing_internal(style))?,
            left: it.next().ok_or_else(|| missing_internal(style))?,
            right: it.next().ok_or_else(|| missing_internal(style))?,
            bottom_left: it.next().ok_or_else(|| missing_internal(style))?,
            bottom: it.next().ok_or_else(|| missing_internal(style))?,
            bottom_right: it.next().ok_or_else(|| missing_internal(style))?,
            close: it.next(),
            close_disabled: it.next(),
        })
    }

    /// Cap/center/cap sprites for one button kind. Kind-specific
    /// sprites (`button/{kind}/left`) win over the shared base set
    /// (`button/left`), which is required.
    pub fn button_sprites(
        &self,
        style: StyleId,
        kind: style::ButtonKind,
    ) -> Result<ButtonSprites, AssetError> {
        let kind_slug = match kind {
            style::ButtonKind::Default => "default",
            style::ButtonKind::Recommended => "recommended",
            style::ButtonKind::Disabled => "disabled",
        };
        let mut out = Vec::with_capacity(3);
        let mut missing = Vec::new();
        for part in ["left", "center", "right"] {
            let sprite = self
                .resolved_image(style, &["button", kind_slug, part])?
                .map_or_else(|| self.resolved_image(style, &["button", part]), |s| Ok(Some(s)))?;
            match sprite {
                Some(s) => out.push(s),
                None => missing.push(format!("button/{part}")),
            }
        }
        if !missing.is_empty() {
            return Err(AssetError::MissingAssets {
                style: style.slug().to_owned(),
                expected: vec![
                    "button/left".to_owned(),
                    "button/center".to_owned(),
                    "button/right".to_owned(),
                ],
                missing,
            });
        }
        let mut it = out.into_iter();
        Ok(ButtonSprites {
            left: it.next().ok_or_else(|| missing_internal(style))?,
            center: it.next().ok_or_else(|| missing_internal(style))?,
            right: it.next().ok_or_else(|| missing_internal(style))?,
        })
    }

    /// Tiled backdrop of the button strip, if the style ships one.
    pub fn button_area_background(
        &self,
        style: StyleId,
    ) -> Result<Option<Arc<RgbaImage>>, AssetError> {
        self.resolved_image(style, &["button", "background"])
    }

    /// Tiled backdrop of the content area, if the style ships one.
    pub fn content_background(
        &self,
        style: StyleId,
    ) -> Result<Option<Arc<RgbaImage>>, AssetError> {
        self.resolved_image(style, &["content", "background"])
    }

    // ── Fonts ───────────────────────────────────────────────────────

    /// Load (or fetch the cached) font set at `fonts/{font}`.
    ///
    /// The metrics document lives at `fonts/{font}/font`; every other
    /// leaf under the same prefix is a variation atlas named by its
    /// relative id.
    pub fn font_set(&self, font: &str) -> Result<Arc<FontSet>, AssetError> {
        if let Some(hit) = self.fonts.get(font) {
            return Ok(Arc::clone(&hit));
        }
        let start = Instant::now();

        let mut prefix = vec!["fonts"];
        prefix.extend(font.split('/').filter(|s| !s.is_empty()));

        let metrics_path = {
            let mut key = prefix.clone();
            key.push("font");
            self.tree
                .get(&key)
                .ok_or_else(|| AssetError::FontNotFound(font.to_owned()))?
                .to_path_buf()
        };
        let document = std::fs::read_to_string(&metrics_path)?;
        let metrics = bmfont::parse(&document)?;

        let mut set = FontSet::new(Arc::new(metrics));
        let leaves: Vec<(String, PathBuf)> = self
            .tree
            .leaves_under(&prefix)
            .into_iter()
            .map(|(id, path)| (id, path.to_path_buf()))
            .collect();
        for (id, path) in leaves {
            if id == "font" {
                continue;
            }
            set.add_variation(id, pixmap::load_png(&path)?);
        }
        if set.variation_names().is_empty() {
            log::warn!("font {font:?} has metrics but no variation atlases");
        }

        log::info!(
            "loaded font {} with {} variations ({:.1}ms)",
            set.font(),
            set.variation_names().len(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        let arc = Arc::new(set);
        self.fonts.insert(font.to_owned(), Arc::clone(&arc));
        Ok(arc)
    }

    // ── Icons ───────────────────────────────────────────────────────

    /// The icon `id` for `style`, scaled to the style's icon size.
    ///
    /// Icon sets are owned by the style that physically ships them, so
    /// the lookup walks the alias chain; the cache key uses the owning
    /// style's slug, letting colorways share decodes.
    pub fn icon(
        &self,
        style: StyleId,
        id: u32,
        policy: IconPolicy,
    ) -> Result<IconImage, AssetError> {
        let (w, h) = style::definition(style).metrics.icon_size;

        let mut cursor = Some(style);
        while let Some(current) = cursor {
            if let Some(set) = self.icon_sets.get(&current) {
                if let Some(path) = set.entries.get(&id) {
                    let key = format!("icon_{}_{id}", current.slug());
                    if let Some(hit) = self.icons.get(&key) {
                        return Ok(IconImage {
                            image: Arc::clone(&hit),
                            id,
                        });
                    }
                    let decoded = pixmap::load_png(path)?;
                    let scaled = if (decoded.width(), decoded.height()) == (w, h) {
                        decoded
                    } else {
                        pixmap::stretch(&decoded, w, h)
                    };
                    let arc = Arc::new(scaled);
                    self.icons.insert(key, Arc::clone(&arc));
                    return Ok(IconImage { image: arc, id });
                }
            }
            cursor = style::definition(current).alias;
        }

        match policy {
            IconPolicy::Fail => Err(AssetError::IconNotFound {
                style: style.slug().to_owned(),
                id,
            }),
            IconPolicy::Placeholder => {
                log::warn!("icon {id} missing for {}, using placeholder", style.slug());
                // Blank canvas at the expected size; the sentinel id
                // lets callers detect the substitution.
                Ok(IconImage {
                    image: Arc::new(pixmap::blank(w, h)),
                    id: PLACEHOLDER_ICON_ID,
                })
            }
        }
    }

    /// Cache occupancy, for diagnostics.
    pub fn cache_sizes(&self) -> (usize, usize, usize) {
        (self.images.len(), self.fonts.len(), self.icons.len())
    }
}

fn missing_internal(style: StyleId) -> AssetError {
    // Unreachable after resolve_group succeeds; kept as an error rather
    // than a panic so a future refactor cannot turn it into one.
    AssetError::MissingAssets {
        style: style.slug().to_owned(),
        expected: Vec::new(),
        missing: Vec::new(),
    }
}

fn index_icon_set(dir: &Path) -> Result<IconSet, std::io::Error> {
    let mut entries = FxHashMap::default();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match stem.parse::<u32>() {
            Ok(id) => {
                entries.insert(id, path);
            }
            Err(_) => {
                log::warn!("ignoring non-numeric icon entry {}", path.display());
            }
        }
    }
    Ok(IconSet { entries })
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ButtonKind;

    fn entry(id: &str) -> (String, PathBuf) {
        (id.to_owned(), PathBuf::from(format!("/assets/{id}.png")))
    }

    fn manager(ids: &[&str]) -> AssetManager {
        AssetManager::with_tree(ResourceTree::from_entries(
            ids.iter().map(|id| entry(id)),
        ))
    }

    #[test]
    fn test_resolve_prefers_requested_theme() {
        let m = manager(&[
            "styles/luna/themes/default/frame/top",
            "styles/luna/themes/common/frame/top",
        ]);
        assert_eq!(
            m.resolve(StyleId::Luna, &["frame", "top"]),
            Some(Path::new("/assets/styles/luna/themes/default/frame/top.png")),
        );
    }

    #[test]
    fn test_resolve_falls_back_to_common() {
        let m = manager(&["styles/luna/themes/common/frame/top"]);
        assert_eq!(
            m.resolve(StyleId::Luna, &["frame", "top"]),
            Some(Path::new("/assets/styles/luna/themes/common/frame/top.png")),
        );
    }

    #[test]
    fn test_colorway_finds_its_theme_in_alias_parent() {
        // The olive colorway ships nothing itself; its assets live in
        // the parent's olive theme directory.
        let m = manager(&[
            "styles/luna/themes/default/frame/top",
            "styles/luna/themes/olive/frame/top",
        ]);
        assert_eq!(
            m.resolve(StyleId::LunaOlive, &["frame", "top"]),
            Some(Path::new("/assets/styles/luna/themes/olive/frame/top.png")),
        );
    }

    #[test]
    fn test_colorway_falls_back_to_parent_default() {
        let m = manager(&["styles/luna/themes/default/frame/top"]);
        // No olive assets anywhere: the walk lands on the parent's
        // default theme.
        assert_eq!(
            m.resolve(StyleId::LunaSilver, &["frame", "top"]),
            Some(Path::new("/assets/styles/luna/themes/default/frame/top.png")),
        );
    }

    #[test]
    fn test_own_assets_beat_alias_parent() {
        let m = manager(&[
            "styles/luna_olive/themes/common/frame/top",
            "styles/luna/themes/olive/frame/top",
        ]);
        assert_eq!(
            m.resolve(StyleId::LunaOlive, &["frame", "top"]),
            Some(Path::new(
                "/assets/styles/luna_olive/themes/common/frame/top.png"
            )),
        );
    }

    #[test]
    fn test_resolve_miss() {
        let m = manager(&["styles/classic/themes/default/frame/top"]);
        assert!(m.resolve(StyleId::Luna, &["frame", "top"]).is_none());
    }

    #[test]
    fn test_missing_frame_enumerates_group() {
        let m = manager(&[
            "styles/classic/themes/default/frame/top_left",
            "styles/classic/themes/default/frame/top",
        ]);
        let err = m.frame_sprites(StyleId::Classic).unwrap_err();
        match err {
            AssetError::MissingAssets {
                style,
                expected,
                missing,
            } => {
                assert_eq!(style, "classic");
                // 8 borders + close pair (classic has a close control).
                assert_eq!(expected.len(), 10);
                assert_eq!(missing.len(), 8);
                assert!(missing.contains(&"frame/bottom_right".to_owned()));
                assert!(missing.contains(&"frame/close".to_owned()));
                assert!(!missing.contains(&"frame/top".to_owned()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_frame_group_excludes_close_without_capability() {
        let m = manager(&[]);
        let err = m.frame_sprites(StyleId::Platinum).unwrap_err();
        match err {
            AssetError::MissingAssets { expected, .. } => {
                assert_eq!(expected.len(), 8);
                assert!(!expected.contains(&"frame/close".to_owned()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_button_sprites() {
        let m = manager(&[]);
        let err = m
            .button_sprites(StyleId::Classic, ButtonKind::Default)
            .unwrap_err();
        match err {
            AssetError::MissingAssets { missing, .. } => {
                assert_eq!(missing.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_icon_policy_fail() {
        let m = manager(&[]);
        let err = m
            .icon(StyleId::Classic, 32, IconPolicy::Fail)
            .unwrap_err();
        assert!(matches!(err, AssetError::IconNotFound { id: 32, .. }));
    }

    #[test]
    fn test_icon_policy_placeholder() {
        let m = manager(&[]);
        let icon = m
            .icon(StyleId::Classic, 32, IconPolicy::Placeholder)
            .unwrap();
        assert!(icon.is_placeholder());
        assert_eq!(icon.id, PLACEHOLDER_ICON_ID);
        let (w, h) = style::definition(StyleId::Classic).metrics.icon_size;
        assert_eq!((icon.image.width(), icon.image.height()), (w, h));
        // Blank canvas, fully transparent.
        assert_eq!(icon.image.get_pixel(w / 2, h / 2)[3], 0);
    }

    #[test]
    fn test_font_not_found() {
        let m = manager(&[]);
        let err = m.font_set("sans/11").unwrap_err();
        assert!(matches!(err, AssetError::FontNotFound(f) if f == "sans/11"));
    }

    #[test]
    fn test_cache_sizes_start_empty() {
        let m = manager(&[]);
        assert_eq!(m.cache_sizes(), (0, 0, 0));
    }
}
