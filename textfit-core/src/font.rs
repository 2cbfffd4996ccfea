//! Font value type.
//!
//! A [`Font`] only carries what the fit engine needs: a point size and the
//! bold/italic flags. Family resolution belongs to the measurement provider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Point size used by [`Font::default`] to mark an uninitialized font.
pub const UNINITIALIZED_POINT_SIZE: f32 = -1.0;

/// Sizes at or above this are not sane.
pub const MAX_SANE_POINT_SIZE: f32 = 5000.0;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Font {
    pub point_size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self::new(UNINITIALIZED_POINT_SIZE)
    }
}

impl Font {
    pub fn new(point_size: f32) -> Self {
        Self {
            point_size,
            bold: false,
            italic: false,
        }
    }

    pub fn styled(point_size: f32, bold: bool, italic: bool) -> Self {
        Self {
            point_size,
            bold,
            italic,
        }
    }

    /// Same bold/italic, different point size.
    pub fn with_size(&self, point_size: f32) -> Self {
        Self {
            point_size,
            ..*self
        }
    }

    /// Scaled copy, clamped below by `min_size` and rounded to a whole size.
    pub fn times(&self, factor: f32, min_size: f32) -> Self {
        let size = (self.point_size * factor).max(min_size);
        self.with_size(size.round_ties_even())
    }

    pub fn is_sane(&self) -> bool {
        self.point_size > 0.0 && self.point_size < MAX_SANE_POINT_SIZE
    }

    /// Compact key for measurement caches: the size rounded up, with the
    /// bold and italic flags in bits 16 and 17.
    pub fn cache_hash(&self) -> u32 {
        let mut r = (self.point_size + 0.99999).max(0.0) as u32;
        if self.bold {
            r += 1 << 16;
        }
        if self.italic {
            r += 1 << 17;
        }
        r
    }

    /// A sane stroke width for lines drawn next to text in this font.
    pub fn proportional_line_stroke_width(&self) -> f32 {
        (self.point_size * 0.11 + 0.5).round_ties_even()
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point_size)?;
        if self.bold {
            write!(f, " bold")?;
        }
        if self.italic {
            write!(f, " italic")?;
        }
        Ok(())
    }
}
