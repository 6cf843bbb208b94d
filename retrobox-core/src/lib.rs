//! # retrobox-core
//!
//! Shared model for the retrobox dialog compositor: the grapheme-level
//! [`Symbol`] rendering unit, integer pixel geometry, and deterministic
//! CPU-side operations over RGBA pixel buffers.
//!
//! ## Architecture
//!
//! ```text
//! Symbol ("é", "👍🏽", "A")          Point / Rect (pixel space)
//!     │                                  │
//!     ▼                                  ▼
//! pixmap ops ── blit / tile / stretch / crop / blur ──► RgbaImage
//!                                                          │
//!                                                          ▼
//!                                                     PNG bytes
//! ```
//!
//! - **`symbol`** — one renderable unit, possibly several code points.
//! - **`geom`**   — integer `Point` and `Rect`.
//! - **`pixmap`** — alpha-blended blitting, tiling, nearest-neighbour
//!   stretching, content cropping, grayscale/shadow helpers, PNG IO.

pub mod geom;
pub mod pixmap;
pub mod symbol;

// Re-exports for ergonomic use.
pub use geom::{Point, Rect};
pub use pixmap::PixmapError;
pub use symbol::Symbol;
