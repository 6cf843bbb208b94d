//! # retrobox-text
//!
//! Bitmap-font text engine for the retrobox dialog compositor: parsed
//! glyph metrics, line wrapping, glyph compositing, and the build-time
//! atlas packing pipeline.
//!
//! ## Architecture
//!
//! ```text
//! metrics document ──parse──► BitmapFont ◄──metrics── collect (rayon fan-out)
//!                                 │                        │
//!                 wrap / measure  │                  shelf-pack ──► atlas PNG
//!                                 ▼
//! FontSet (atlas variations) ──draw──► TextRender { image, size, baseline }
//! ```
//!
//! - **`font`**    — `FontChar` / `BitmapFont` metrics and measurement.
//! - **`bmfont`**  — metrics document parse + canonical emit.
//! - **`layout`**  — wrapping, truncation, the break rules.
//! - **`fontset`** — variation atlases with lazy pre-cut glyph caches.
//! - **`compose`** — glyph blitting, mnemonic underline, drop shadow.
//! - **`atlas`**   — single-pass shelf packer (asset-build time).
//! - **`collect`** — parallel glyph rasterization fan-out.

pub mod atlas;
pub mod bmfont;
pub mod collect;
pub mod compose;
pub mod font;
pub mod fontset;
pub mod layout;

// Re-exports for ergonomic use.
pub use bmfont::FontError;
pub use compose::{draw, DrawOptions, ShadowSpec, TextError, TextRender};
pub use font::{BitmapFont, FontChar};
pub use fontset::{FontSet, Variation};
pub use layout::{Truncation, WrapMode, ELLIPSIS};
