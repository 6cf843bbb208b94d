//! # retrobox-render
//!
//! Dialog compositor for retrobox: turns a [`DialogConfig`] plus an
//! asset root into one finished dialog raster.
//!
//! ## Architecture
//!
//! ```text
//! DialogConfig ──validate──► sizing negotiation (natural widths)
//!                                   │
//!            content area ◄── common inner width ──► button row
//!                                   │
//!                            frame + title + close
//!                                   ▼
//!                        RenderedDialog { image, stats }
//! ```
//!
//! - **`config`**  — the serializable request model and its validation.
//! - **`button`**  — cap/center/cap buttons and the button row.
//! - **`content`** — icon plus wrapped body text.
//! - **`frame`**   — nine-slice border, title bar, close control.
//! - **`dialog`**  — sizing negotiation and final assembly.

pub mod button;
pub mod config;
pub mod content;
pub mod dialog;
pub mod error;
pub mod frame;

// Re-exports for ergonomic use.
pub use config::{Alignment, ButtonConfig, ConfigError, DialogConfig};
pub use dialog::{render_dialog, RenderStats, RenderedDialog};
pub use error::RenderError;
