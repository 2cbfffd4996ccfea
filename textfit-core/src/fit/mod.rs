//! Font-fit engine.
//!
//! Finds the drawing font size at which an [`AttributedString`] fits an
//! available box. Searches never touch the run: each step produces a
//! [`FitState`] for one candidate size, and only the final answer is
//! written back into the run's drawing font size.
//!
//! ```text
//! single line:  candidate ──measure──► overflow ratio ──► smaller candidate   (≤ depth 3)
//! multi-line:   min-size line height ──► line-mode decision ──► bisection     (≤ depth 10)
//! empty text:   "Xq" probe at 1000pt ──► proportional guess ──► ±1 steps
//! ```
//!
//! - **`single_line`** — shrink-to-fit for text that must stay on one line.
//! - **`multi_line`** — bisection for text allowed to wrap.
//! - **`height`** — height-only fitting for fonts and empty runs.
//! - **`shrinkage`** — measuring helpers built on the searches.

mod height;
mod multi_line;
mod shrinkage;
mod single_line;

use crate::config::FitConfig;
use crate::font::MAX_SANE_POINT_SIZE;
use crate::geometry::SizeF;
use crate::sizing::TextSizing;

/// Available heights at or above this are treated as unbounded.
pub const SCREEN_DIMENSION_TOO_BIG: f32 = 1e5;

/// Largest whole size any search will try.
pub const MAX_FIT_SIZE: f32 = MAX_SANE_POINT_SIZE - 1.0;

/// One step of a search: a candidate size and, once measured, its bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitState {
    pub candidate_font_size: f32,
    /// `None` when the search stopped before measuring this candidate.
    pub measured: Option<SizeF>,
}

impl FitState {
    pub fn measured(candidate_font_size: f32, bounds: SizeF) -> Self {
        Self {
            candidate_font_size,
            measured: Some(bounds),
        }
    }

    pub fn unmeasured(candidate_font_size: f32) -> Self {
        Self {
            candidate_font_size,
            measured: None,
        }
    }

    /// True only for a measured candidate inside `available`.
    pub fn fits(&self, available: SizeF) -> bool {
        self.measured.is_some_and(|m| available.contains(m))
    }
}

/// How the bisection measures each candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineMode {
    /// Unlimited width: the text is measured on one line.
    SingleLine,
    /// Wrapped at the available width.
    Wrapped,
}

impl LineMode {
    fn wrap_width(self, available: SizeF) -> Option<f32> {
        match self {
            Self::SingleLine => None,
            Self::Wrapped => (available.width > 0.0 && available.width.is_finite())
                .then_some(available.width),
        }
    }
}

/// Bisection bracket: `bad` is known too big, `good` is known to fit and
/// `test` is the next size to try.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bracket {
    pub bad: i32,
    pub good: i32,
    pub test: i32,
}

impl Bracket {
    pub fn new(bad: i32, good: i32, test: i32) -> Self {
        Self { bad, good, test }
    }

    fn is_closed(&self) -> bool {
        self.good + 1 >= self.bad
    }
}

/// Truncating midpoint of `low <= high` that cannot overflow.
fn midpoint(low: i32, high: i32) -> i32 {
    low + (high - low) / 2
}

/// Font-fit engine bound to one measurement provider and configuration.
pub struct FitEngine<'a, S: TextSizing + ?Sized> {
    sizing: &'a S,
    config: FitConfig,
}

impl<'a, S: TextSizing + ?Sized> FitEngine<'a, S> {
    pub fn new(sizing: &'a S, config: FitConfig) -> Self {
        Self { sizing, config }
    }

    pub fn with_defaults(sizing: &'a S) -> Self {
        Self::new(sizing, FitConfig::default())
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn sizing(&self) -> &'a S {
        self.sizing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_state_requires_measurement() {
        let available = SizeF::new(100.0, 30.0);
        assert!(FitState::measured(10.0, SizeF::new(100.0, 30.0)).fits(available));
        assert!(!FitState::measured(10.0, SizeF::new(101.0, 30.0)).fits(available));
        assert!(!FitState::unmeasured(10.0).fits(available));
    }

    #[test]
    fn test_wrap_width() {
        let available = SizeF::new(120.0, 40.0);
        assert_eq!(LineMode::SingleLine.wrap_width(available), None);
        assert_eq!(LineMode::Wrapped.wrap_width(available), Some(120.0));
        assert_eq!(LineMode::Wrapped.wrap_width(SizeF::new(0.0, 40.0)), None);
    }

    #[test]
    fn test_midpoint_near_i32_max() {
        assert_eq!(midpoint(3, 6), 4);
        assert_eq!(midpoint(3, 4), 3);
        assert_eq!(midpoint(i32::MAX - 2, i32::MAX), i32::MAX - 1);
    }

    #[test]
    fn test_bracket_closed() {
        assert!(Bracket::new(10, 9, 9).is_closed());
        assert!(!Bracket::new(10, 8, 9).is_closed());
    }
}
