//! Render-side error type: one enum that every compositor stage funnels
//! into, so callers match on a single surface.

use retrobox_assets::AssetError;
use retrobox_core::PixmapError;
use retrobox_text::TextError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Pixmap(#[from] PixmapError),
}
