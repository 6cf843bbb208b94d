//! # retrobox-assets
//!
//! Style registry and asset pipeline for the retrobox dialog
//! compositor: the closed set of shipped skins with their metrics, the
//! resource trie built from one filesystem scan, and the manager that
//! resolves, decodes, and caches sprites, fonts, and icons.
//!
//! ## Architecture
//!
//! ```text
//! asset root ──scan──► ResourceTree (trie, extension-stripped ids)
//!                            │
//!      StyleId ──resolve──► AssetManager ──► FrameSprites / ButtonSprites
//!   (theme + alias walk)        │                FontSet / IconImage
//!                        DashMap caches
//! ```
//!
//! - **`style`**   — `StyleId`, capabilities, `StyleMetrics`, aliases.
//! - **`tree`**    — the resource trie and the deterministic scan.
//! - **`manager`** — resolution walk, sprite groups, decode caches.

pub mod manager;
pub mod style;
pub mod tree;

// Re-exports for ergonomic use.
pub use manager::{
    AssetError, AssetManager, ButtonSprites, FrameSprites, IconImage, IconPolicy,
    PLACEHOLDER_ICON_ID,
};
pub use style::{
    definition, ButtonKind, ButtonMetrics, Capabilities, CloseAnchor, FillMode, FontSelector,
    StyleDefinition, StyleId, StyleMetrics,
};
pub use tree::ResourceTree;
