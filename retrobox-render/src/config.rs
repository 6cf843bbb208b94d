//! Dialog request model — the serializable description of one render.
//!
//! A [`DialogConfig`] is validated up front so that every capability
//! violation surfaces as a [`ConfigError`] before any asset is touched;
//! a request that passes validation can still fail later on missing
//! assets, but never on its own shape.

use retrobox_assets::{style, ButtonKind, IconPolicy, StyleId};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("style {style} supports at most {max} buttons, got {got}")]
    TooManyButtons {
        style: String,
        max: usize,
        got: usize,
    },

    #[error("button {index} has empty text")]
    EmptyButtonText { index: usize },

    #[error("max width {got} is below the style minimum {min}")]
    MaxWidthTooSmall { got: u32, min: u32 },
}

/// Horizontal placement of the button row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    #[default]
    Right,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub text: String,
    #[serde(default = "default_kind")]
    pub kind: ButtonKind,
    /// Underline the first symbol of the label.
    #[serde(default)]
    pub mnemonic: bool,
}

fn default_kind() -> ButtonKind {
    ButtonKind::Default
}

fn default_true() -> bool {
    true
}

/// One dialog render request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DialogConfig {
    pub style: StyleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Icon id within the style's icon set.
    #[serde(default)]
    pub icon: Option<u32>,
    #[serde(default)]
    pub buttons: Vec<ButtonConfig>,
    #[serde(default)]
    pub button_align: Alignment,
    /// Cap on the dialog's outer width, in pixels.
    #[serde(default)]
    pub max_width: Option<u32>,
    /// Draw the close control in its enabled rendition.
    #[serde(default = "default_true")]
    pub close_enabled: bool,
    /// Reorder buttons by the style's preferred kind order instead of
    /// keeping request order.
    #[serde(default)]
    pub sort_buttons: bool,
    #[serde(default)]
    pub icon_policy: IconPolicy,
}

impl DialogConfig {
    /// Shape-level validation; no assets are touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let def = style::definition(self.style);
        if self.buttons.len() > def.caps.max_buttons {
            return Err(ConfigError::TooManyButtons {
                style: self.style.slug().to_owned(),
                max: def.caps.max_buttons,
                got: self.buttons.len(),
            });
        }
        for (index, button) in self.buttons.iter().enumerate() {
            if button.text.trim().is_empty() {
                return Err(ConfigError::EmptyButtonText { index });
            }
        }
        if let Some(max) = self.max_width {
            if max < def.metrics.min_inner_width {
                return Err(ConfigError::MaxWidthTooSmall {
                    got: max,
                    min: def.metrics.min_inner_width,
                });
            }
        }
        Ok(())
    }
}

// ===================================================================
// Tests
// ===================================================================
