//! Geometry primitives and the rounding helpers used when measuring text.
//!
//! Text boxes handed to renderers must be integral, so most of this module
//! is about turning fractional measurements into whole-pixel rectangles
//! without losing coverage.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn plus(self, other: PointF) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rounds each dimension to the nearest integer (ties to even).
    pub fn to_integral(self) -> Self {
        Self::new(self.width.round_ties_even(), self.height.round_ties_even())
    }

    /// True if `other` fits inside `self` in both dimensions.
    pub fn contains(&self, other: SizeF) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Smallest rectangle with integer coordinates that wraps this one.
    ///
    /// A rectangle with zero width or height, or with any non-finite
    /// component, is returned unchanged.
    pub fn integral(self) -> Self {
        if !self.is_finite() || self.width == 0.0 || self.height == 0.0 {
            return self;
        }
        let x = self.x.floor();
        let y = self.y.floor();
        let right = self.right().ceil();
        let bottom = self.bottom().ceil();
        Self::new(x, y, right - x, bottom - y)
    }
}

/// Rounds to the nearest integer (ties to even), saturating at the `i32` range.
pub fn round_to_int(x: f32) -> i32 {
    if x > i32::MAX as f32 {
        i32::MAX
    } else {
        x.round_ties_even() as i32
    }
}

/// Truncating division. With `minimum_of_1`, any ratio that is not greater
/// than 1 (NaN included) yields exactly 1.
///
/// Truncation happens after the division, so `(5/3) / (1/3)` can come out
/// as 4 rather than 5.
pub fn divide_round_down(x: f32, y: f32, minimum_of_1: bool) -> f32 {
    let ratio = x / y;
    if minimum_of_1 && !(ratio > 1.0) {
        1.0
    } else {
        ratio.trunc()
    }
}

/// Maximum of two floats where NaN always loses. Two NaNs give NaN.
pub fn max_ignoring_nan(a: f32, b: f32) -> f32 {
    match (a.is_nan(), b.is_nan()) {
        (true, _) => b,
        (_, true) => a,
        _ => a.max(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_rect_wraps_fraction() {
        let r = RectF::new(0.5, -12.3, 10.2, 15.1).integral();
        assert_eq!(r, RectF::new(0.0, -13.0, 11.0, 16.0));
    }

    #[test]
    fn test_integral_rect_keeps_degenerate() {
        let zero_width = RectF::new(0.5, 0.5, 0.0, 3.2);
        assert_eq!(zero_width.integral(), zero_width);

        let nan = RectF::new(f32::NAN, 0.0, 1.0, 1.0);
        assert!(nan.integral().x.is_nan());
    }

    #[test]
    fn test_to_integral_size_ties_to_even() {
        let s = SizeF::new(2.5, 3.5).to_integral();
        assert_eq!(s, SizeF::new(2.0, 4.0));
    }

    #[test]
    fn test_round_to_int() {
        assert_eq!(round_to_int(49.5), 50);
        assert_eq!(round_to_int(50.5), 50);
        assert_eq!(round_to_int(1e20), i32::MAX);
    }

    #[test]
    fn test_divide_round_down() {
        assert_eq!(divide_round_down(40.0, 1.2, false), 33.0);
        assert_eq!(divide_round_down(1.0, 3.0, true), 1.0);
        assert_eq!(divide_round_down(1.0, 3.0, false), 0.0);
        assert_eq!(divide_round_down(0.0, 0.0, true), 1.0);
    }

    #[test]
    fn test_max_ignoring_nan() {
        assert_eq!(max_ignoring_nan(3.0, f32::NAN), 3.0);
        assert_eq!(max_ignoring_nan(f32::NAN, 4.0), 4.0);
        assert_eq!(max_ignoring_nan(3.0, 4.0), 4.0);
        assert!(max_ignoring_nan(f32::NAN, f32::NAN).is_nan());
    }
}
