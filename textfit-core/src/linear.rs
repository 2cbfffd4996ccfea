//! Deterministic linear measurement model.
//!
//! Every glyph is the same width and every metric is proportional to the
//! point size. Used as the measurement back end in tests and as the
//! font-free fallback of the CLI. Arithmetic runs in `f64` so exact
//! products such as `0.6 * 40` come out exact after rounding.

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::font::Font;
use crate::geometry::RectF;
use crate::sizing::{TextSizing, TextSizingExt};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearTextSizing {
    pub ascent_coefficient: f64,
    pub descent_coefficient: f64,
    pub width_coefficient: f64,
    pub leading_coefficient: f64,
}

impl Default for LinearTextSizing {
    fn default() -> Self {
        Self::new(0.6, 0.15, 0.6, 0.1)
    }
}

impl LinearTextSizing {
    pub fn new(ascent: f64, descent: f64, width: f64, leading: f64) -> Self {
        Self {
            ascent_coefficient: ascent,
            descent_coefficient: descent,
            width_coefficient: width,
            leading_coefficient: leading,
        }
    }

    pub fn width_per_char(&self, font: &Font) -> f64 {
        font.point_size as f64 * self.width_coefficient
    }

    pub fn leading(&self, font: &Font) -> f64 {
        font.point_size as f64 * self.leading_coefficient
    }

    /// Line count when `chars` glyphs wrap at `max_width`.
    fn line_count(&self, chars: usize, font: &Font, max_width: f64) -> usize {
        if max_width >= i32::MAX as f64 {
            return 1;
        }
        let per_char = self.width_per_char(font);
        // One extra for round-off, trimmed below.
        let mut per_line = (max_width / per_char) as usize + 1;
        while per_line > 1 && per_line as f64 * per_char > max_width {
            per_line -= 1;
        }
        chars.div_ceil(per_line.max(1))
    }
}

impl TextSizing for LinearTextSizing {
    fn raw_bounding_rect(
        &self,
        text: &str,
        font: &Font,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        if text.is_empty() {
            return Ok(RectF::default());
        }
        let chars = text.chars().count();
        let width = chars as f64 * self.width_per_char(font);
        let ascent = self.ascent(font);
        let descent = self.descent(font);
        let single = RectF::new(0.0, -ascent, width as f32, ascent + descent);

        let Some(max_width) = max_width else {
            return Ok(single);
        };
        if !(max_width > 0.0) {
            return Err(MeasureError::InvalidWidth(max_width));
        }
        let lines = self.line_count(chars, font, max_width as f64);
        if lines <= 1 {
            return Ok(single);
        }
        let leading = self.leading(font);
        let height = lines as f64 * (ascent + descent) as f64 + (lines - 1) as f64 * leading;
        Ok(RectF::new(0.0, -ascent, max_width, height as f32))
    }

    fn raw_ascent(&self, font: &Font) -> f32 {
        (font.point_size as f64 * self.ascent_coefficient) as f32
    }

    fn raw_descent(&self, font: &Font) -> f32 {
        (font.point_size as f64 * self.descent_coefficient) as f32
    }
}
