use crate::attributed_string::AttributedString;
use crate::error::FitError;
use crate::font::Font;
use crate::geometry::{round_to_int, SizeF};
use crate::sizing::{TextSizing, TextSizingExt};

use super::{midpoint, Bracket, FitEngine, FitState, LineMode, MAX_FIT_SIZE};

impl<S: TextSizing + ?Sized> FitEngine<'_, S> {
    /// Fits `run`, which may wrap, inside `available` and caches the result
    /// as its drawing font size. A result at or above the base size clears
    /// the drawing size instead.
    pub fn compute_drawing_font_size(
        &self,
        run: &mut AttributedString,
        available: SizeF,
        minimum_font_size: i32,
        single_line_shrink_ratio: f32,
    ) -> Result<(), FitError> {
        let fitted = self.multiline_font_size_that_fits(
            run,
            available,
            minimum_font_size,
            single_line_shrink_ratio,
        )?;
        let base = run.base_font().point_size;
        if fitted <= 0 || fitted as f32 >= base {
            run.clear_drawing_font_size();
        } else {
            run.set_drawing_font_size(fitted as f32)?;
        }
        Ok(())
    }

    /// [`compute_drawing_font_size`](Self::compute_drawing_font_size) with
    /// the minimum size and shrink ratio taken from the engine's config.
    pub fn compute_drawing_font_size_with_config(
        &self,
        run: &mut AttributedString,
        available: SizeF,
    ) -> Result<(), FitError> {
        self.compute_drawing_font_size(
            run,
            available,
            self.config.minimum_font_size,
            self.config.single_line_shrink_ratio,
        )
    }

    /// Largest whole size in `[minimum_font_size, base]` at which `run` fits,
    /// with one exception: if shrinking to `base * single_line_shrink_ratio`
    /// lets the text fit on a single line, the search is done in single-line
    /// mode and a smaller one-line result wins over a larger wrapped one.
    ///
    /// When even one line at the minimum size is taller than `available`,
    /// the minimum is abandoned and only height is fitted, down to 1.
    /// Returns 0 when the base font has no positive size. Bases above
    /// [`MAX_FIT_SIZE`] are searched from that size.
    pub fn multiline_font_size_that_fits(
        &self,
        run: &AttributedString,
        available: SizeF,
        minimum_font_size: i32,
        single_line_shrink_ratio: f32,
    ) -> Result<i32, FitError> {
        let base = run.base_font();
        if !(base.point_size > 0.0) {
            return Ok(0);
        }
        let available = available.to_integral();
        let minimum = minimum_font_size.max(1);
        let text = run.text();

        let line_height = self
            .sizing
            .bounding_size_of(text, &base.with_size(minimum as f32), None)?
            .height;

        if line_height > available.height {
            log::trace!(
                "one line at minimum {minimum} is {line_height} tall, over {}; fitting height only",
                available.height
            );
            let tall = SizeF::new(f32::INFINITY, available.height);
            let bracket = Bracket::new(minimum, 1, midpoint(0, minimum).max(1));
            return self.font_size_that_fits(text, &base, tall, bracket, LineMode::SingleLine);
        }

        let rounded = base.point_size.min(MAX_FIT_SIZE) as i32;
        self.multiline_binary_search(
            text,
            &base,
            available,
            Bracket::new(rounded, minimum, rounded),
            single_line_shrink_ratio,
        )
    }

    fn multiline_binary_search(
        &self,
        text: &str,
        base: &Font,
        available: SizeF,
        bracket: Bracket,
        single_line_shrink_ratio: f32,
    ) -> Result<i32, FitError> {
        if bracket.good > bracket.test {
            // The minimum is above the base size.
            return Ok(bracket.test);
        }
        let mode = self.line_mode(text, base, available, single_line_shrink_ratio)?;
        log::trace!("multi-line search for {text:?} in {mode:?} mode");
        self.font_size_that_fits(text, base, available, bracket, mode)
    }

    /// Single-line mode if the text fits the available width on one line at
    /// `round(base * ratio)`. A ratio of 1 or more always wraps.
    pub fn line_mode(
        &self,
        text: &str,
        base: &Font,
        available: SizeF,
        single_line_shrink_ratio: f32,
    ) -> Result<LineMode, FitError> {
        if single_line_shrink_ratio >= 1.0 {
            return Ok(LineMode::Wrapped);
        }
        let shrunk = round_to_int(base.point_size * single_line_shrink_ratio);
        let width = self
            .sizing
            .bounding_size_of(text, &base.with_size(shrunk as f32), None)?
            .width;
        if width <= available.width {
            Ok(LineMode::SingleLine)
        } else {
            Ok(LineMode::Wrapped)
        }
    }

    /// Bisection between a size known too big and one known to fit. Ends
    /// when the bracket closes or the depth cap runs out, always answering
    /// with the best size known to fit.
    pub fn font_size_that_fits(
        &self,
        text: &str,
        base: &Font,
        available: SizeF,
        bracket: Bracket,
        mode: LineMode,
    ) -> Result<i32, FitError> {
        let mut bracket = bracket;
        let wrap_width = mode.wrap_width(available);
        for _ in 0..self.config.multi_line_max_depth {
            if bracket.is_closed() {
                break;
            }
            let measured = self
                .sizing
                .bounding_size_of(text, &base.with_size(bracket.test as f32), wrap_width)?;
            let state = FitState::measured(bracket.test as f32, measured);
            bracket = if state.fits(available) {
                Bracket::new(bracket.bad, bracket.test, midpoint(bracket.test, bracket.bad))
            } else {
                Bracket::new(bracket.test, bracket.good, midpoint(bracket.good, bracket.test))
            };
            log::trace!("bisection {bracket:?}");
        }
        Ok(bracket.good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::linear::LinearTextSizing;

    fn run(text: &str, size: f32) -> AttributedString {
        AttributedString::new(text, Font::new(size), Color::BLACK)
    }

    #[test]
    fn test_fits_at_base_clears_drawing_size() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let mut s = run("Hi", 20.0);
        s.set_drawing_font_size(11.0).unwrap();
        engine
            .compute_drawing_font_size(&mut s, SizeF::new(200.0, 100.0), 8, 1.0)
            .unwrap();
        assert!(!s.has_drawing_font_size());
    }

    #[test]
    fn test_wrapped_search_finds_largest_fitting() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let s = run("Hello", 40.0);
        let size = engine
            .multiline_font_size_that_fits(&s, SizeF::new(100.0, 30.0), 8, 1.0)
            .unwrap();
        assert_eq!(size, 33);
    }

    #[test]
    fn test_wrapping_allowed_when_tall_enough() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let s = run("Hello", 40.0);
        // Two lines at 40 are 64 tall.
        let size = engine
            .multiline_font_size_that_fits(&s, SizeF::new(100.0, 64.0), 8, 1.0)
            .unwrap();
        assert_eq!(size, 40);
    }

    #[test]
    fn test_non_positive_base_skips() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let mut s = run("Hello", 0.0);
        assert_eq!(
            engine
                .multiline_font_size_that_fits(&s, SizeF::new(10.0, 10.0), 8, 1.0)
                .unwrap(),
            0
        );
        engine
            .compute_drawing_font_size(&mut s, SizeF::new(10.0, 10.0), 8, 1.0)
            .unwrap();
        assert!(!s.has_drawing_font_size());
    }

    #[test]
    fn test_height_fallback_goes_below_minimum() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let s = run("Hello", 40.0);
        // One line at 8 is 7 tall.
        let size = engine
            .multiline_font_size_that_fits(&s, SizeF::new(1000.0, 5.0), 8, 1.0)
            .unwrap();
        assert!(size < 8 && size >= 1);
        assert!(ts.line_height(&Font::new(size as f32)) <= 5.0);
        assert!(ts.line_height(&Font::new(size as f32 + 1.0)) > 5.0);
    }

    #[test]
    fn test_height_fallback_never_returns_zero() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let mut s = run("Hello", 40.0);
        let size = engine
            .multiline_font_size_that_fits(&s, SizeF::new(1000.0, 0.0), 1, 1.0)
            .unwrap();
        assert_eq!(size, 1);
        engine
            .compute_drawing_font_size(&mut s, SizeF::new(1000.0, 0.0), 1, 1.0)
            .unwrap();
        assert_eq!(s.drawing_font_size(), Some(1.0));
    }

    #[test]
    fn test_height_fallback_with_tiny_minimums() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let s = run("Hello", 40.0);
        // One line is 2 tall at size 1, 3 tall at sizes 2 and 3.
        for (minimum, height) in [(1, 1.0), (2, 2.0), (3, 2.0)] {
            let size = engine
                .multiline_font_size_that_fits(&s, SizeF::new(1000.0, height), minimum, 1.0)
                .unwrap();
            assert_eq!(size, 1, "minimum {minimum} in height {height}");
        }
    }

    #[test]
    fn test_huge_base_size_does_not_overflow() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let mut s = run("Hello", 3.0e9);
        let available = SizeF::new(100.0, 30.0);
        let size = engine
            .multiline_font_size_that_fits(&s, available, 8, 1.0)
            .unwrap();
        assert!((8..=33).contains(&size), "got {size}");
        let bounds = ts
            .bounding_size_of("Hello", &Font::new(size as f32), Some(100.0))
            .unwrap();
        assert!(available.contains(bounds));

        engine.compute_drawing_font_size(&mut s, available, 8, 1.0).unwrap();
        assert_eq!(s.drawing_font_size(), Some(size as f32));
    }

    #[test]
    fn test_minimum_above_base_returns_base() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let s = run("Hello", 6.0);
        let size = engine
            .multiline_font_size_that_fits(&s, SizeF::new(1000.0, 100.0), 8, 1.0)
            .unwrap();
        assert_eq!(size, 6);
    }

    #[test]
    fn test_line_mode_decision() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::with_defaults(&ts);
        let base = Font::new(100.0);
        let available = SizeF::new(300.0, 200.0);
        assert_eq!(
            engine.line_mode("HelloWorld", &base, available, 0.5).unwrap(),
            LineMode::SingleLine
        );
        assert_eq!(
            engine.line_mode("HelloWorld", &base, available, 0.4999).unwrap(),
            LineMode::SingleLine
        );
        assert_eq!(
            engine.line_mode("HelloWorld", &base, available, 0.6).unwrap(),
            LineMode::Wrapped
        );
        assert_eq!(
            engine.line_mode("HelloWorld", &base, available, 1.0).unwrap(),
            LineMode::Wrapped
        );
    }

    #[test]
    fn test_config_driven_entry_point() {
        let ts = LinearTextSizing::default();
        let engine = FitEngine::new(
            &ts,
            crate::config::FitConfig::default().with_shrink_ratio(0.5),
        );
        let mut s = run("HelloWorld", 100.0);
        engine
            .compute_drawing_font_size_with_config(&mut s, SizeF::new(300.0, 200.0))
            .unwrap();
        assert_eq!(s.drawing_font_size(), Some(50.0));
    }
}
