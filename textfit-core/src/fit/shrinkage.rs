use crate::attributed_string::AttributedString;
use crate::error::FitError;
use crate::geometry::{round_to_int, RectF, SizeF};
use crate::sizing::{TextSizing, TextSizingExt};

use super::{FitEngine, LineMode};

impl<S: TextSizing + ?Sized> FitEngine<'_, S> {
    /// Bounds of `run` inside `size` when it may shrink to
    /// `round(base * ratio)` to stay on one line. Returns the bounds and
    /// whether they are for a single line.
    ///
    /// Either the text shrinks for width or it wraps at the base size; there
    /// is no mix of both. The reported height never exceeds `size.height`.
    /// `run` itself is left as it was.
    pub fn bounding_size_with_single_line_shrinkage(
        &self,
        run: &AttributedString,
        size: SizeF,
        ratio: f32,
    ) -> Result<(SizeF, bool), FitError> {
        if run.is_empty() {
            return Ok((SizeF::default(), true));
        }

        let raw = self.sizing.bounding_rectangle(run, false, None)?;
        if raw.width <= size.width && raw.height <= size.height {
            return Ok((raw.size(), true));
        }

        let base = run.base_font().point_size;
        let width_font_size = round_to_int(base * ratio);
        let safe_height = if raw.height > 0.0 { raw.height } else { 1.0 };
        let mut min_font_size = width_font_size;
        if size.height < safe_height {
            let height_font_size = (base * size.height / safe_height) as i32;
            min_font_size = min_font_size.min(height_font_size);
        }

        let mut probe = run.clone();
        probe.set_drawing_font_size(min_font_size.max(1) as f32)?;
        if self.sizing.might_fit_on_single_line(&probe, Some(size.width), true) {
            let shrunk_width = self.sizing.raw_bounding_rectangle(&probe, true, None)?.width;
            if shrunk_width <= size.width {
                let mut fitted = run.clone();
                self.compute_single_line_drawing_font_size(&mut fitted, size, None)?;
                let output = self.sizing.bounding_size(&fitted, true, None)?;
                return Ok((SizeF::new(output.width, output.height.min(size.height)), true));
            }
        }

        let wrapped = self
            .sizing
            .raw_bounding_rectangle(run, false, LineMode::Wrapped.wrap_width(size))?;
        Ok((SizeF::new(wrapped.width, wrapped.height.min(size.height)), false))
    }

    /// Longest prefix of `run`, wrapped at `outer.width`, that is no taller
    /// than `outer.height`. The copy keeps the drawing font size.
    pub fn truncate_for_height(
        &self,
        run: &AttributedString,
        outer: RectF,
        use_drawing_font: bool,
    ) -> Result<AttributedString, FitError> {
        let wrap_width = LineMode::Wrapped.wrap_width(outer.size());
        let height = self
            .sizing
            .raw_bounding_rectangle(run, use_drawing_font, wrap_width)?
            .height;
        if height <= outer.height {
            return Ok(run.clone());
        }

        let mut good = 0;
        let mut bad = run.len();
        let mut test = bad / 2;
        while good + 1 < bad {
            let prefix = run.substring(0..test);
            let h = self.sizing.bounding_height(&prefix, use_drawing_font, wrap_width)?;
            if h <= outer.height {
                good = test;
                test = (test + bad + 1) / 2;
            } else {
                bad = test;
                test = (test + good) / 2;
            }
        }
        log::trace!("truncated {} chars to {good}", run.len());
        Ok(run.substring(0..good))
    }
}
