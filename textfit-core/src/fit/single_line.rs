use crate::attributed_string::AttributedString;
use crate::error::FitError;
use crate::font::Font;
use crate::geometry::{divide_round_down, max_ignoring_nan, SizeF};
use crate::sizing::{TextSizing, TextSizingExt};

use super::{FitEngine, FitState, SCREEN_DIMENSION_TOO_BIG};

impl<S: TextSizing + ?Sized> FitEngine<'_, S> {
    /// Fits `run` on a single line inside `available` and caches the result
    /// as its drawing font size.
    ///
    /// There is no minimum size. With `expand_to` the text may grow past
    /// its base size up to that cap when it still fits. Empty runs are
    /// only fitted for height.
    pub fn compute_single_line_drawing_font_size(
        &self,
        run: &mut AttributedString,
        available: SizeF,
        expand_to: Option<f32>,
    ) -> Result<(), FitError> {
        run.clear_drawing_font_size();
        if let Some(size) = self.single_line_drawing_font_size(run, available, expand_to)? {
            run.set_drawing_font_size(size)?;
        }
        Ok(())
    }

    /// The drawing size [`compute_single_line_drawing_font_size`] would
    /// cache, without touching `run`. `None` means the base size is used.
    ///
    /// [`compute_single_line_drawing_font_size`]: Self::compute_single_line_drawing_font_size
    pub fn single_line_drawing_font_size(
        &self,
        run: &AttributedString,
        available: SizeF,
        expand_to: Option<f32>,
    ) -> Result<Option<f32>, FitError> {
        let base = run.base_font();

        let start = max_ignoring_nan(base.point_size, expand_to.unwrap_or(f32::NAN));
        if !(start > 0.0) {
            log::debug!("single-line fit skipped: no usable font size ({start})");
            return Ok(None);
        }

        if run.is_empty() {
            if available.height < SCREEN_DIMENSION_TOO_BIG {
                let font = self.font_that_fits_height(&base, available.height, expand_to)?;
                return Ok(Some(font.point_size));
            }
            return Ok(None);
        }

        if self.skips_single_line_fit(run, &base, available, expand_to) {
            log::trace!(
                "single-line fit skipped for {} chars at {}",
                run.len(),
                base.point_size
            );
            return Ok(None);
        }

        let state = self.single_line_fit(run.text(), &base, available, start)?;
        let size = state.candidate_font_size;
        Ok((size != base.point_size).then_some(size))
    }

    /// The cheap predictor: long text whose `chars * size` is comfortably
    /// under the available width is assumed to fit at its base size. Short
    /// text always gets measured, as does any request to expand.
    fn skips_single_line_fit(
        &self,
        run: &AttributedString,
        base: &Font,
        available: SizeF,
        expand_to: Option<f32>,
    ) -> bool {
        let expanding = expand_to.is_some_and(|e| e > base.point_size);
        if expanding || run.len() <= self.config.dont_bother_length {
            return false;
        }
        let product = run.len() as f32 * base.point_size;
        product < self.config.heuristic_width_factor * available.width
    }

    /// Damped shrink: each overflowing measurement divides the candidate by
    /// the worst overflow ratio, rounding down with a floor of 1. Running out
    /// of iterations keeps the last, unmeasured, candidate.
    pub fn single_line_fit(
        &self,
        text: &str,
        base: &Font,
        available: SizeF,
        start_size: f32,
    ) -> Result<FitState, FitError> {
        let mut candidate = start_size;
        let mut remaining = self.config.single_line_max_depth;
        loop {
            let measured = self
                .sizing
                .bounding_size_of(text, &base.with_size(candidate), None)?;
            let state = FitState::measured(candidate, measured);
            if state.fits(available) {
                return Ok(state);
            }

            let width_ratio = measured.width / available.width;
            let height_ratio = measured.height / available.height;
            let next = divide_round_down(candidate, width_ratio.max(height_ratio), true);
            log::trace!(
                "single-line overflow at {candidate}: {}x{} in {}x{}, next {next}",
                measured.width,
                measured.height,
                available.width,
                available.height
            );

            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                log::debug!(
                    "single-line fit did not converge for {text:?}; keeping {next} unverified"
                );
                return Ok(FitState::unmeasured(next));
            }
            candidate = next;
        }
    }
}
