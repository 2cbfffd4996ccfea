//! # textfit-text
//!
//! Real-font measurement for the textfit engine, via `cosmic-text`.
//!
//! ## Architecture
//!
//! ```text
//! FitEngine<CosmicTextSizing>
//!     │
//!     ▼
//! raw_bounding_rect(text, font, wrap) ──► LruCache hit? ──► RectF
//!     │ miss
//!     ▼
//! cosmic-text FontSystem + Buffer layout ──► widest line, line count
//! ```
//!
//! - **`sizing`** — The [`TextSizing`](textfit_core::TextSizing) provider.

pub mod sizing;

pub use sizing::{CosmicSizingConfig, CosmicTextSizing};
