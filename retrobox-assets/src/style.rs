//! System styles — the closed set of shipped dialog skins.
//!
//! A [`StyleId`] names one visual skin; its [`StyleDefinition`] carries
//! display metadata, a capability descriptor, the dimensional
//! [`StyleMetrics`], and optionally an *alias* — another style whose
//! assets back this one when it ships none of its own (the olive and
//! silver Luna colorways are pure aliases of the blue one, selecting a
//! different theme through the resolution walk).
//!
//! Derived styles start from a parent's metrics and override fields
//! with plain struct-update syntax; there is no reflection and no
//! inheritance, so every copied field is visible in this file.

use retrobox_core::Point;
use retrobox_text::ShadowSpec;
use serde::{Deserialize, Serialize};

// ── Style identity ──────────────────────────────────────────────────

/// Closed set of shipped skins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    /// Beveled gray classic.
    Classic,
    /// Classic with the millennium-era tweaks.
    Millennium,
    /// Blue gradient skin.
    Luna,
    /// Olive colorway of Luna (asset alias).
    LunaOlive,
    /// Silver colorway of Luna (asset alias).
    LunaSilver,
    /// Brushed-platinum skin.
    Platinum,
}

impl StyleId {
    pub const ALL: [StyleId; 6] = [
        StyleId::Classic,
        StyleId::Millennium,
        StyleId::Luna,
        StyleId::LunaOlive,
        StyleId::LunaSilver,
        StyleId::Platinum,
    ];

    /// Path segment under `styles/` in the resource namespace.
    pub fn slug(&self) -> &'static str {
        match self {
            StyleId::Classic => "classic",
            StyleId::Millennium => "millennium",
            StyleId::Luna => "luna",
            StyleId::LunaOlive => "luna_olive",
            StyleId::LunaSilver => "luna_silver",
            StyleId::Platinum => "platinum",
        }
    }

    pub fn from_slug(slug: &str) -> Option<StyleId> {
        StyleId::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// Button role requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Default,
    Recommended,
    Disabled,
}

/// What a skin can express.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// How many buttons fit the skin's button strip.
    pub max_buttons: usize,
    /// Whether the skin draws a close control in the title bar.
    pub has_close: bool,
}

/// Anchor corner for the close control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseAnchor {
    TopLeft,
    TopCenter,
    TopRight,
}

/// How a stretchable sprite fills its target extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
    Stretch,
    Tile,
}

/// Which font set and variation a text role uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSelector {
    /// Font path under `fonts/`, e.g. `"sans/11"`.
    pub font: &'static str,
    /// Variation path within the font, e.g. `"black"`.
    pub variation: &'static str,
}

/// Per-button-kind dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonMetrics {
    /// Width floor, applied after text measurement.
    pub min_width: u32,
    /// Horizontal padding on each side of the label.
    pub h_padding: u32,
    /// Label baseline offset from the button's vertical midline.
    pub baseline_offset: i32,
}

/// Dimensional and layout constants of one skin.
#[derive(Clone, Debug)]
pub struct StyleMetrics {
    /// Padding around the content area's icon and text.
    pub content_padding: u32,
    /// Gap between the icon's right edge and the text.
    pub icon_text_gap: u32,
    /// Content-area height floor.
    pub content_min_height: u32,
    /// Expected icon dimensions (also the placeholder size).
    pub icon_size: (u32, u32),
    /// Inner dialog width floor.
    pub min_inner_width: u32,

    pub button_spacing: u32,
    /// Padding on both ends of the button strip.
    pub button_area_padding: u32,
    /// How the button center sprite fills the label width.
    pub button_fill: FillMode,
    /// Sort order applied when a request asks for sorted buttons.
    pub button_order: [ButtonKind; 3],
    pub button_default: ButtonMetrics,
    pub button_recommended: ButtonMetrics,
    pub button_disabled: ButtonMetrics,

    /// How the frame's edge strips fill their spans.
    pub frame_fill: FillMode,
    pub title_font: FontSelector,
    pub title_shadow: Option<ShadowSpec>,
    pub content_font: FontSelector,
    pub button_font: FontSelector,
    pub close_anchor: CloseAnchor,
    pub close_offset: Point,
}

impl StyleMetrics {
    pub fn button_metrics(&self, kind: ButtonKind) -> &ButtonMetrics {
        match kind {
            ButtonKind::Default => &self.button_default,
            ButtonKind::Recommended => &self.button_recommended,
            ButtonKind::Disabled => &self.button_disabled,
        }
    }
}

/// Everything known about one skin.
#[derive(Clone, Debug)]
pub struct StyleDefinition {
    pub id: StyleId,
    /// Human-readable name for configuration surfaces.
    pub name: &'static str,
    pub caps: Capabilities,
    /// Style whose assets back this one when resolution misses.
    pub alias: Option<StyleId>,
    /// Theme tried first during resolution.
    pub default_theme: &'static str,
    pub metrics: StyleMetrics,
}

// ── Static definition table ─────────────────────────────────────────

fn classic_metrics() -> StyleMetrics {
    StyleMetrics {
        content_padding: 12,
        icon_text_gap: 12,
        content_min_height: 64,
        icon_size: (32, 32),
        min_inner_width: 112,
        button_spacing: 6,
        button_area_padding: 8,
        button_fill: FillMode::Stretch,
        button_order: [ButtonKind::Recommended, ButtonKind::Default, ButtonKind::Disabled],
        button_default: ButtonMetrics {
            min_width: 66,
            h_padding: 12,
            baseline_offset: 3,
        },
        button_recommended: ButtonMetrics {
            min_width: 66,
            h_padding: 12,
            baseline_offset: 3,
        },
        button_disabled: ButtonMetrics {
            min_width: 66,
            h_padding: 12,
            baseline_offset: 3,
        },
        frame_fill: FillMode::Tile,
        title_font: FontSelector {
            font: "sans/11",
            variation: "white",
        },
        title_shadow: None,
        content_font: FontSelector {
            font: "sans/11",
            variation: "black",
        },
        button_font: FontSelector {
            font: "sans/11",
            variation: "black",
        },
        close_anchor: CloseAnchor::TopRight,
        close_offset: Point::new(-4, 4),
    }
}

fn luna_metrics() -> StyleMetrics {
    StyleMetrics {
        content_padding: 14,
        icon_text_gap: 14,
        content_min_height: 72,
        min_inner_width: 154,
        button_spacing: 8,
        button_area_padding: 10,
        button_order: [ButtonKind::Default, ButtonKind::Recommended, ButtonKind::Disabled],
        button_default: ButtonMetrics {
            min_width: 73,
            h_padding: 14,
            baseline_offset: 4,
        },
        button_recommended: ButtonMetrics {
            min_width: 73,
            h_padding: 14,
            baseline_offset: 4,
        },
        button_disabled: ButtonMetrics {
            min_width: 73,
            h_padding: 14,
            baseline_offset: 4,
        },
        frame_fill: FillMode::Stretch,
        title_font: FontSelector {
            font: "sans/13",
            variation: "white",
        },
        title_shadow: Some(ShadowSpec {
            color: [10, 24, 131, 160],
            offset: Point::new(1, 1),
            radius: 1,
        }),
        content_font: FontSelector {
            font: "sans/13",
            variation: "black",
        },
        button_font: FontSelector {
            font: "sans/13",
            variation: "black",
        },
        close_anchor: CloseAnchor::TopRight,
        close_offset: Point::new(-5, 5),
        ..classic_metrics()
    }
}

fn platinum_metrics() -> StyleMetrics {
    StyleMetrics {
        content_padding: 13,
        button_fill: FillMode::Tile,
        frame_fill: FillMode::Tile,
        title_font: FontSelector {
            font: "sans/11",
            variation: "black",
        },
        close_anchor: CloseAnchor::TopLeft,
        close_offset: Point::new(6, 4),
        ..classic_metrics()
    }
}

/// Definition for one style. Cheap to build; callers that care cache it.
pub fn definition(id: StyleId) -> StyleDefinition {
    match id {
        StyleId::Classic => StyleDefinition {
            id,
            name: "Classic",
            caps: Capabilities {
                max_buttons: 3,
                has_close: true,
            },
            alias: None,
            default_theme: "default",
            metrics: classic_metrics(),
        },
        StyleId::Millennium => StyleDefinition {
            id,
            name: "Millennium",
            caps: Capabilities {
                max_buttons: 3,
                has_close: true,
            },
            alias: Some(StyleId::Classic),
            default_theme: "default",
            metrics: StyleMetrics {
                content_min_height: 68,
                ..classic_metrics()
            },
        },
        StyleId::Luna => StyleDefinition {
            id,
            name: "Luna",
            caps: Capabilities {
                max_buttons: 3,
                has_close: true,
            },
            alias: None,
            default_theme: "default",
            metrics: luna_metrics(),
        },
        StyleId::LunaOlive => StyleDefinition {
            id,
            name: "Luna Olive",
            caps: Capabilities {
                max_buttons: 3,
                has_close: true,
            },
            alias: Some(StyleId::Luna),
            default_theme: "olive",
            metrics: luna_metrics(),
        },
        StyleId::LunaSilver => StyleDefinition {
            id,
            name: "Luna Silver",
            caps: Capabilities {
                max_buttons: 3,
                has_close: true,
            },
            alias: Some(StyleId::Luna),
            default_theme: "silver",
            metrics: luna_metrics(),
        },
        StyleId::Platinum => StyleDefinition {
            id,
            name: "Platinum",
            caps: Capabilities {
                max_buttons: 3,
                has_close: false,
            },
            alias: None,
            default_theme: "default",
            metrics: platinum_metrics(),
        },
    }
}

// ===================================================================
// Tests
// ===================================================================
