//! # textfit-core
//!
//! Font-fit engine: picks the drawing font size at which a styled text run
//! fits an available box, on one line or wrapped.
//!
//! ## Architecture
//!
//! ```text
//! AttributedString (text + base font + cached drawing size)
//!     │
//!     ▼
//! FitEngine<S: TextSizing> ──► single-line shrink / multi-line bisection
//!     │                              │
//!     ▼                              ▼
//! TextSizingExt (rounding) ◄── TextSizing::raw_* (platform back end)
//! ```
//!
//! - **`attributed_string`** — The text run and its drawing-size override.
//! - **`sizing`** — Measurement contract and rounded helpers.
//! - **`linear`** — Deterministic measurement model for tests and fallback.
//! - **`fit`** — The searches.
//! - **`config`** — Tunables, loadable from JSON.

pub mod attributed_string;
pub mod attributes;
pub mod color;
pub mod config;
pub mod error;
pub mod fit;
pub mod font;
pub mod geometry;
pub mod linear;
pub mod sizing;

// Re-exports for ergonomic use.
pub use attributed_string::{AttributedString, FontSource};
pub use attributes::{Attributes, HorizontalAlignment, VerticalAlignment};
pub use color::Color;
pub use config::FitConfig;
pub use error::{FitError, MeasureError};
pub use fit::{Bracket, FitEngine, FitState, LineMode};
pub use font::Font;
pub use geometry::{PointF, RectF, SizeF};
pub use linear::LinearTextSizing;
pub use sizing::{TextSizing, TextSizingExt};
