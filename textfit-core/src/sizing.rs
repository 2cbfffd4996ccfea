//! Text measurement contract.
//!
//! Platform back ends implement the three raw methods of [`TextSizing`].
//! Everything rounded is derived here in [`TextSizingExt`]: ascent and
//! descent are rounded up separately and bounding rectangles are made
//! integral, so a bounding height can grow by anything between 0 and 2
//! over the raw value.
//!
//! ```text
//! fit engine ──► TextSizingExt (rounding, retry) ──► TextSizing::raw_* (platform)
//! ```

use crate::attributed_string::AttributedString;
use crate::error::MeasureError;
use crate::font::Font;
use crate::geometry::{RectF, SizeF};

/// Platform-supplied text measurement.
///
/// Implementations must be deterministic for a given (text, font, width)
/// triple, and a larger font must never produce smaller bounds.
pub trait TextSizing {
    /// Unrounded bounds of `text` drawn in `font` with the baseline at
    /// y = 0 and starting at x = 0. `None` measures a single line; a width
    /// wraps the text and may produce several lines.
    fn raw_bounding_rect(
        &self,
        text: &str,
        font: &Font,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError>;

    fn raw_ascent(&self, font: &Font) -> f32;

    fn raw_descent(&self, font: &Font) -> f32;

    /// Horizontal distance the cursor moves after drawing `run`.
    fn cursor_advance(&self, run: &AttributedString) -> Result<f32, MeasureError> {
        self.bounding_width(run, true, None)
    }

    /// Drop any memoized measurements, e.g. after system font sizes change.
    fn clear_cache(&self) {}
}

/// Rounded measurements and cheap layout predicates derived from the raw
/// [`TextSizing`] methods.
pub trait TextSizingExt: TextSizing {
    /// Measures with the drawing or the base font of `run`, unrounded.
    fn raw_bounding_rectangle(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        self.raw_bounding_rect(run.text(), &run.font(use_drawing_font), max_width)
    }

    /// Integral bounds of `text` in `font`. A failed measurement is retried
    /// once; a second failure is returned to the caller.
    fn bounding_rect_of(
        &self,
        text: &str,
        font: &Font,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        let raw = match self.raw_bounding_rect(text, font, max_width) {
            Ok(rect) => rect,
            Err(e) => {
                log::warn!("Text measurement failed, retrying once: {e}");
                self.raw_bounding_rect(text, font, max_width)?
            }
        };
        Ok(raw.integral())
    }

    fn bounding_size_of(
        &self,
        text: &str,
        font: &Font,
        max_width: Option<f32>,
    ) -> Result<SizeF, MeasureError> {
        Ok(self.bounding_rect_of(text, font, max_width)?.size())
    }

    fn bounding_rectangle(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        self.bounding_rect_of(run.text(), &run.font(use_drawing_font), max_width)
    }

    /// [`bounding_rectangle`](Self::bounding_rectangle) offset to a draw point.
    fn bounding_rectangle_at(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        x: f32,
        y: f32,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        Ok(self.bounding_rectangle(run, use_drawing_font, max_width)?.offset(x, y))
    }

    fn bounding_size(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        max_width: Option<f32>,
    ) -> Result<SizeF, MeasureError> {
        Ok(self.bounding_rectangle(run, use_drawing_font, max_width)?.size())
    }

    fn bounding_width(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        max_width: Option<f32>,
    ) -> Result<f32, MeasureError> {
        Ok(self.bounding_size(run, use_drawing_font, max_width)?.width)
    }

    fn bounding_height(
        &self,
        run: &AttributedString,
        use_drawing_font: bool,
        max_width: Option<f32>,
    ) -> Result<f32, MeasureError> {
        Ok(self.bounding_size(run, use_drawing_font, max_width)?.height)
    }

    fn ascent(&self, font: &Font) -> f32 {
        self.raw_ascent(font).ceil()
    }

    fn descent(&self, font: &Font) -> f32 {
        self.raw_descent(font).ceil()
    }

    /// Rounded ascent plus rounded descent.
    fn line_height(&self, font: &Font) -> f32 {
        self.ascent(font) + self.descent(font)
    }

    /// The widest of `strings` at a reference size of 50. Empty input, or
    /// input where every width is zero, gives an empty string.
    fn longest<'a>(&self, strings: &[&'a str]) -> Result<&'a str, MeasureError> {
        let font = Font::new(50.0);
        let mut best = "";
        let mut max_width = 0.0;
        for s in strings {
            let width = self.bounding_size_of(s, &font, None)?.width;
            if width > max_width {
                max_width = width;
                best = s;
            }
        }
        Ok(best)
    }

    /// Quick check that skips measurement: true unless
    /// `chars * point_size` is at least three times `width`. A missing or
    /// non-finite width always passes.
    fn might_fit_on_single_line(
        &self,
        run: &AttributedString,
        width: Option<f32>,
        use_drawing_font: bool,
    ) -> bool {
        match width {
            Some(w) if w.is_finite() => {
                let product = run.len() as f32 * run.font(use_drawing_font).point_size;
                product < 3.0 * w
            }
            _ => true,
        }
    }

    /// True if `run` has drawable text that fits on one line of `max_width`.
    fn is_single_line(
        &self,
        run: &AttributedString,
        max_width: f32,
        use_drawing_font: bool,
    ) -> Result<bool, MeasureError> {
        if !run.has_drawable_text() || !self.might_fit_on_single_line(run, Some(max_width), use_drawing_font) {
            return Ok(false);
        }
        let rect = self.raw_bounding_rectangle(run, use_drawing_font, None)?;
        Ok(rect.right().ceil() - rect.x.floor() <= max_width)
    }
}

impl<T: TextSizing + ?Sized> TextSizingExt for T {}

/// Reference string used to measure a font's full line height.
pub(crate) const LINE_HEIGHT_PROBE: &str = "Xq";
