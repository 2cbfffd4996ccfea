//! The attributed string: text, base font, color and a cached drawing size.
//!
//! The drawing font size is the only piece of derived state. It is tagged
//! with the revision it was computed at, and every change to the text or
//! the font source bumps the revision, so a stale size can never be read
//! back after the inputs it was fitted to have changed.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::attributes::Attributes;
use crate::color::Color;
use crate::error::FitError;
use crate::font::Font;
use crate::geometry::{PointF, RectF};

// ── Font source ─────────────────────────────────────────────────────

/// Supplier of the base (pre-shrink) font.
#[derive(Clone)]
pub enum FontSource {
    Fixed(Font),
    /// Resolved on every read, e.g. from a style sheet that can change.
    Deferred(Arc<dyn Fn() -> Font + Send + Sync>),
}

impl FontSource {
    pub fn resolve(&self) -> Font {
        match self {
            Self::Fixed(font) => *font,
            Self::Deferred(getter) => getter(),
        }
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(font) => f.debug_tuple("Fixed").field(font).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Font> for FontSource {
    fn from(font: Font) -> Self {
        Self::Fixed(font)
    }
}

// ── Attributed string ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct DrawingSize {
    size: f32,
    revision: u64,
}

#[derive(Clone, Debug)]
pub struct AttributedString {
    text: String,
    font: FontSource,
    pub color: Color,
    pub attributes: Attributes,
    revision: u64,
    drawing: Option<DrawingSize>,
}

impl AttributedString {
    pub fn new(text: impl Into<String>, font: Font, color: Color) -> Self {
        Self::with_font_source(text, FontSource::Fixed(font), color)
    }

    pub fn with_font_getter(
        text: impl Into<String>,
        getter: impl Fn() -> Font + Send + Sync + 'static,
        color: Color,
    ) -> Self {
        Self::with_font_source(text, FontSource::Deferred(Arc::new(getter)), color)
    }

    pub fn with_font_source(text: impl Into<String>, font: FontSource, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            color,
            attributes: Attributes::default(),
            revision: 0,
            drawing: None,
        }
    }

    /// Text with no style of its own; the font and color come later.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Font::default(), Color::TRANSPARENT)
    }

    /// Incremented on every change to the text or the font source.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.drawing = None;
    }

    // ── Text ────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text. A different value invalidates the drawing size.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.invalidate();
        }
    }

    pub fn set_text_keeping_drawing_font_size(&mut self, text: impl Into<String>) {
        let kept = self.drawing_font_size();
        self.set_text(text);
        if let Some(size) = kept {
            self.drawing = Some(DrawingSize {
                size,
                revision: self.revision,
            });
        }
    }

    /// Sets the text, turning every underscore that follows a digit into an
    /// underline on that digit. A leading underscore is left in place.
    pub fn set_text_replacing_underscores(&mut self, text: &str) {
        let mut out = String::with_capacity(text.len());
        let mut underlined = Vec::new();
        let mut out_len = 0usize;
        let mut previous: Option<char> = None;
        for c in text.chars() {
            let after_digit = previous.is_some_and(char::is_numeric);
            if c == '_' && out_len > 0 && after_digit {
                underlined.push(out_len - 1);
            } else {
                out.push(c);
                out_len += 1;
            }
            previous = Some(c);
        }
        self.set_text(out);
        self.attributes.underline = None;
        for index in underlined {
            self.attributes.set_underlined(index);
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    // ── Fonts ───────────────────────────────────────────────────────

    /// The font before any shrinking for drawing.
    pub fn base_font(&self) -> Font {
        self.font.resolve()
    }

    pub fn font_source(&self) -> &FontSource {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.set_font_source(FontSource::Fixed(font));
    }

    pub fn set_font_getter(&mut self, getter: impl Fn() -> Font + Send + Sync + 'static) {
        self.set_font_source(FontSource::Deferred(Arc::new(getter)));
    }

    pub fn set_font_source(&mut self, font: FontSource) {
        self.font = font;
        self.invalidate();
    }

    /// The base font resized to the drawing size, if one is set.
    pub fn drawing_font(&self) -> Font {
        let base = self.base_font();
        match self.drawing_font_size() {
            Some(size) => base.with_size(size),
            None => base,
        }
    }

    pub fn font(&self, use_drawing_font: bool) -> Font {
        if use_drawing_font {
            self.drawing_font()
        } else {
            self.base_font()
        }
    }

    // ── Drawing font size ───────────────────────────────────────────

    /// Sets the cached drawing size. NaN clears it.
    ///
    /// Negative and infinite sizes are rejected, as is zero unless the text
    /// is blank.
    pub fn set_drawing_font_size(&mut self, size: f32) -> Result<(), FitError> {
        if size.is_nan() {
            self.drawing = None;
            return Ok(());
        }
        if size < 0.0 || size.is_infinite() {
            return Err(FitError::InvalidFontSize(size));
        }
        if size == 0.0 && !self.text.trim().is_empty() {
            return Err(FitError::ZeroFontSize);
        }
        if cfg!(debug_assertions) && size.fract() != 0.0 && !self.text.is_empty() {
            log::debug!("fractional drawing font size {size} for {:?}", self.text);
        }
        self.drawing = Some(DrawingSize {
            size,
            revision: self.revision,
        });
        Ok(())
    }

    pub fn clear_drawing_font_size(&mut self) {
        self.drawing = None;
    }

    pub fn drawing_font_size(&self) -> Option<f32> {
        self.drawing
            .filter(|d| d.revision == self.revision)
            .map(|d| d.size)
    }

    pub fn has_drawing_font_size(&self) -> bool {
        self.drawing_font_size().is_some()
    }

    /// The drawing size, or the base size when none is cached.
    pub fn drawing_font_size_or_base(&self) -> f32 {
        self.drawing_font_size()
            .unwrap_or_else(|| self.base_font().point_size)
    }

    /// Adds `delta` to the drawing size, but only while the current size
    /// stays above `2 + delta`. Returns whether the size changed.
    pub fn change_drawing_font_size(&mut self, delta: f32) -> bool {
        let old = self.drawing_font_size_or_base();
        if old > 2.0 + delta {
            self.set_drawing_font_size(old + delta).is_ok()
        } else {
            false
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Non-blank text, a positive drawing size and a visible color.
    pub fn has_drawable_text(&self) -> bool {
        !self.text.trim().is_empty()
            && self.drawing_font_size_or_base() > 0.0
            && self.color.is_visible()
    }

    pub fn equals_text_font_color(&self, other: &AttributedString) -> bool {
        self.text == other.text && self.base_font() == other.base_font() && self.color == other.color
    }

    pub fn accessibility_label(&self, try_hard: bool) -> Option<&str> {
        let label = self.attributes.accessibility_label.as_deref();
        if !try_hard {
            return label;
        }
        [label, Some(self.text.as_str()), self.attributes.ghosted_text.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }

    /// Anchor point inside `outer` given the run's alignments.
    pub fn alignment_point(&self, outer: RectF) -> PointF {
        let x_factor = self.attributes.horizontal_alignment().multiplier();
        let y_factor = self.attributes.vertical_alignment().multiplier();
        PointF::new(
            outer.x + x_factor * outer.width,
            outer.y + y_factor * outer.height,
        )
    }

    /// Copy with its location translated by `dxy`. Runs without a location
    /// come back unchanged.
    pub fn moved(&self, dxy: PointF) -> AttributedString {
        let mut r = self.clone();
        if let Some(location) = r.attributes.location.filter(|l| !l.is_nan()) {
            r.attributes.location = Some(location.plus(dxy));
        }
        r
    }

    /// The chars in `range`, keeping the drawing font size.
    pub fn substring(&self, range: Range<usize>) -> AttributedString {
        let text: String = self
            .text
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect();
        let mut r = self.clone();
        r.set_text_keeping_drawing_font_size(text);
        r
    }
}

impl fmt::Display for AttributedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        let size = self.base_font().point_size;
        if size < 8.0 {
            write!(f, " fontSize {size}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{HorizontalAlignment, VerticalAlignment};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn sample() -> AttributedString {
        AttributedString::new("Hello", Font::new(40.0), Color::BLACK)
    }

    #[test]
    fn test_drawing_font_defaults_to_base() {
        let s = sample();
        assert!(!s.has_drawing_font_size());
        assert_eq!(s.drawing_font(), Font::new(40.0));
        assert_eq!(s.drawing_font_size_or_base(), 40.0);
    }

    #[test]
    fn test_set_and_clear_drawing_font_size() {
        let mut s = sample();
        s.set_drawing_font_size(20.0).unwrap();
        assert_eq!(s.drawing_font().point_size, 20.0);
        assert_eq!(s.base_font().point_size, 40.0);
        s.clear_drawing_font_size();
        assert!(!s.has_drawing_font_size());
        s.set_drawing_font_size(12.0).unwrap();
        s.set_drawing_font_size(f32::NAN).unwrap();
        assert!(!s.has_drawing_font_size());
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        let mut s = sample();
        assert_eq!(s.set_drawing_font_size(-3.0), Err(FitError::InvalidFontSize(-3.0)));
        assert!(s.set_drawing_font_size(f32::INFINITY).is_err());
        assert_eq!(s.set_drawing_font_size(0.0), Err(FitError::ZeroFontSize));
        assert!(!s.has_drawing_font_size());

        let mut blank = AttributedString::new("  ", Font::new(10.0), Color::BLACK);
        assert!(blank.set_drawing_font_size(0.0).is_ok());
    }

    #[test]
    fn test_text_change_invalidates() {
        let mut s = sample();
        s.set_drawing_font_size(20.0).unwrap();
        s.set_text("Hello");
        assert!(s.has_drawing_font_size(), "same text is not a change");
        s.set_text("World");
        assert!(!s.has_drawing_font_size());
    }

    #[test]
    fn test_font_change_invalidates() {
        let mut s = sample();
        s.set_drawing_font_size(20.0).unwrap();
        s.set_font(Font::new(40.0));
        assert!(!s.has_drawing_font_size());

        s.set_drawing_font_size(20.0).unwrap();
        s.set_font_getter(|| Font::new(30.0));
        assert!(!s.has_drawing_font_size());
        assert_eq!(s.base_font().point_size, 30.0);
    }

    #[test]
    fn test_deferred_font_resolves_each_read() {
        static SIZE: AtomicU32 = AtomicU32::new(10);
        let s = AttributedString::with_font_getter(
            "abc",
            || Font::new(SIZE.load(Ordering::SeqCst) as f32),
            Color::BLACK,
        );
        assert_eq!(s.base_font().point_size, 10.0);
        SIZE.store(14, Ordering::SeqCst);
        assert_eq!(s.base_font().point_size, 14.0);
    }

    #[test]
    fn test_keep_drawing_size_across_text_change() {
        let mut s = sample();
        s.set_drawing_font_size(22.0).unwrap();
        s.set_text_keeping_drawing_font_size("Other");
        assert_eq!(s.drawing_font_size(), Some(22.0));
        assert_eq!(s.text(), "Other");
    }

    #[test]
    fn test_replace_underscores() {
        let mut s = AttributedString::new("", Font::new(12.0), Color::BLACK);
        s.set_text_replacing_underscores("x2_+3_");
        assert_eq!(s.text(), "x2+3");
        assert!(s.attributes.is_underlined(1));
        assert!(s.attributes.is_underlined(3));
        assert!(!s.attributes.is_underlined(0));

        s.set_text_replacing_underscores("_a_1__");
        assert_eq!(s.text(), "_a_1_");
        assert!(s.attributes.is_underlined(3));
    }

    #[test]
    fn test_change_drawing_font_size() {
        let mut s = sample();
        assert!(s.change_drawing_font_size(-5.0));
        assert_eq!(s.drawing_font_size(), Some(35.0));

        let mut tiny = AttributedString::new("a", Font::new(2.5), Color::BLACK);
        assert!(!tiny.change_drawing_font_size(1.0));
    }

    #[test]
    fn test_drawable_text() {
        assert!(sample().has_drawable_text());
        assert!(!AttributedString::new(" ", Font::new(10.0), Color::BLACK).has_drawable_text());
        assert!(!AttributedString::new("a", Font::new(10.0), Color::TRANSPARENT).has_drawable_text());
        assert!(!AttributedString::text_only("a").has_drawable_text());
    }

    #[test]
    fn test_alignment_point() {
        let mut s = sample();
        s.attributes.horizontal_alignment = Some(HorizontalAlignment::Center);
        s.attributes.vertical_alignment = Some(VerticalAlignment::Bottom);
        let p = s.alignment_point(RectF::new(10.0, 20.0, 100.0, 40.0));
        assert_eq!(p, PointF::new(60.0, 60.0));
    }

    #[test]
    fn test_moved_and_substring() {
        let mut s = sample();
        let unplaced = s.moved(PointF::new(1.0, 1.0));
        assert_eq!(unplaced.attributes.location, None);

        s.attributes.location = Some(PointF::new(5.0, 5.0));
        let moved = s.moved(PointF::new(1.0, -2.0));
        assert_eq!(moved.attributes.location, Some(PointF::new(6.0, 3.0)));

        s.set_drawing_font_size(30.0).unwrap();
        let sub = s.substring(1..4);
        assert_eq!(sub.text(), "ell");
        assert_eq!(sub.drawing_font_size(), Some(30.0));
    }

    #[test]
    fn test_accessibility_label() {
        let mut s = sample();
        assert_eq!(s.accessibility_label(false), None);
        assert_eq!(s.accessibility_label(true), Some("Hello"));
        s.attributes.accessibility_label = Some("Greeting".into());
        assert_eq!(s.accessibility_label(false), Some("Greeting"));
    }

    #[test]
    fn test_equals_text_font_color() {
        let a = sample();
        let mut b = sample();
        assert!(a.equals_text_font_color(&b));
        b.color = Color::WHITE;
        assert!(!a.equals_text_font_color(&b));
    }
}
