use crate::error::FitError;
use crate::font::Font;
use crate::geometry::max_ignoring_nan;
use crate::sizing::{TextSizing, TextSizingExt, LINE_HEIGHT_PROBE};

use super::{FitEngine, MAX_FIT_SIZE};

/// Size the line-height probe is first measured at.
const PROBE_SIZE: f32 = 1000.0;

impl<S: TextSizing + ?Sized> FitEngine<'_, S> {
    /// Largest whole size, capped at `max(font size, expand_to)`, whose full
    /// line (ascender to descender) is no taller than `line_height`.
    ///
    /// One measurement at a large reference size gives a proportional guess;
    /// single-point steps then correct for rounding. The result never drops
    /// below 1, and the cap is clamped to [`MAX_FIT_SIZE`]. A font with no
    /// positive size to cap at comes back unchanged.
    pub fn font_that_fits_height(
        &self,
        font: &Font,
        line_height: f32,
        expand_to: Option<f32>,
    ) -> Result<Font, FitError> {
        let cap = max_ignoring_nan(font.point_size, expand_to.unwrap_or(f32::NAN));
        if !(cap > 0.0) {
            return Ok(*font);
        }
        let cap = cap.min(MAX_FIT_SIZE);

        let probe_height = self.probe_height(font, PROBE_SIZE)?;
        let guess = (PROBE_SIZE * line_height / probe_height).trunc().max(1.0);
        let mut size = if guess < cap { guess } else { cap };

        let mut grew = false;
        while size + 1.0 <= cap && self.probe_height(font, size + 1.0)? <= line_height {
            size += 1.0;
            grew = true;
        }
        if !grew {
            while size > 1.0 && self.probe_height(font, size)? > line_height {
                size = (size - 1.0).max(1.0);
            }
        }
        Ok(font.with_size(size))
    }

    /// Shrinks `font` until its rounded ascent plus descent is no taller than
    /// `height`. A non-positive height leaves the font alone.
    pub fn shrink_to_fit_height(&self, font: &Font, height: f32) -> Font {
        let font_height = self.sizing.line_height(font);
        if !(font_height > height && height > 0.0) {
            return *font;
        }
        let adjusted = (font.point_size * height / font_height).trunc().max(1.0);
        let r = font.with_size(adjusted);
        if self.sizing.line_height(&r) > height && adjusted > 1.0 {
            font.with_size(adjusted - 1.0)
        } else {
            r
        }
    }

    fn probe_height(&self, font: &Font, size: f32) -> Result<f32, FitError> {
        Ok(self
            .sizing
            .bounding_size_of(LINE_HEIGHT_PROBE, &font.with_size(size), None)?
            .height)
    }
}
