//! Text measurement on top of `cosmic-text`.
//!
//! [`CosmicTextSizing`] owns a `FontSystem` (font discovery + shaping) and
//! lays each run out in a throwaway `Buffer`. Bounds come from the layout:
//! the width is the widest line, the height is the face's ascent plus
//! descent for the first line and one line height for every further line.
//!
//! Layouts are memoized in an LRU keyed on text, font and wrap width.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Stretch, Style, Weight};
use lru::LruCache;

use textfit_core::{Font, MeasureError, RectF, TextSizing};

// ── Configuration ───────────────────────────────────────────────────

/// Construction options for [`CosmicTextSizing`].
#[derive(Clone, Debug, PartialEq)]
pub struct CosmicSizingConfig {
    /// Number of memoized layouts. Zero disables the cache.
    pub cache_capacity: usize,
    /// Distance between baselines as a multiple of the point size.
    pub line_height_factor: f32,
    /// CSS-style family chain; the first entry is used.
    pub family: String,
}

impl Default for CosmicSizingConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1024,
            line_height_factor: 1.2,
            family: String::from("sans-serif"),
        }
    }
}

/// Ascent and descent as fractions of the point size, used when no face
/// can be queried.
const FALLBACK_ASCENT: f32 = 0.8;
const FALLBACK_DESCENT: f32 = 0.2;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    size_bits: u32,
    bold: bool,
    italic: bool,
    width_bits: Option<u32>,
}

impl LayoutKey {
    fn new(text: &str, font: &Font, max_width: Option<f32>) -> Self {
        Self {
            text: text.to_owned(),
            size_bits: font.point_size.to_bits(),
            bold: font.bold,
            italic: font.italic,
            width_bits: max_width.map(f32::to_bits),
        }
    }
}

/// Face metrics in font units.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FaceMetrics {
    ascender: f32,
    descender: f32,
    units_per_em: f32,
}

// ── Back end ────────────────────────────────────────────────────────

/// [`TextSizing`] provider backed by `cosmic-text`.
///
/// Not `Sync`: measurement borrows the font system mutably behind a
/// `RefCell`, so an instance belongs to one thread.
pub struct CosmicTextSizing {
    font_system: RefCell<FontSystem>,
    cache: Option<RefCell<LruCache<LayoutKey, RectF>>>,
    config: CosmicSizingConfig,
}

impl CosmicTextSizing {
    /// Create a provider with system font discovery.
    pub fn new(config: CosmicSizingConfig) -> Self {
        Self::with_font_system(FontSystem::new(), config)
    }

    /// Create a provider around an existing font system, e.g. one with
    /// fonts loaded from memory.
    pub fn with_font_system(font_system: FontSystem, config: CosmicSizingConfig) -> Self {
        let cache = NonZeroUsize::new(config.cache_capacity).map(|cap| RefCell::new(LruCache::new(cap)));
        log::debug!(
            "cosmic-text sizing: {} faces, cache capacity {}",
            font_system.db().faces().count(),
            config.cache_capacity
        );
        Self {
            font_system: RefCell::new(font_system),
            cache,
            config,
        }
    }

    pub fn config(&self) -> &CosmicSizingConfig {
        &self.config
    }

    /// True when font discovery found at least one face.
    pub fn has_fonts(&self) -> bool {
        self.font_system.borrow().db().faces().next().is_some()
    }

    /// Number of memoized layouts.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.borrow().len())
    }

    /// First family of the configured CSS chain.
    fn family(&self) -> Family<'_> {
        let first = self
            .config
            .family
            .split(',')
            .next()
            .unwrap_or(&self.config.family)
            .trim()
            .trim_matches('"')
            .trim_matches('\'');
        match first {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            concrete => Family::Name(concrete),
        }
    }

    fn weight(font: &Font) -> Weight {
        if font.bold {
            Weight::BOLD
        } else {
            Weight::NORMAL
        }
    }

    fn style(font: &Font) -> Style {
        if font.italic {
            Style::Italic
        } else {
            Style::Normal
        }
    }

    fn face_metrics(&self, font: &Font) -> Option<FaceMetrics> {
        let mut font_system = self.font_system.borrow_mut();
        let families = [self.family()];
        let query = cosmic_text::fontdb::Query {
            families: &families,
            weight: Self::weight(font),
            stretch: Stretch::Normal,
            style: Self::style(font),
        };
        let id = font_system.db().query(&query)?;
        let face = font_system.get_font(id)?;
        let face = face.rustybuzz();
        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return None;
        }
        Some(FaceMetrics {
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            units_per_em,
        })
    }

    fn metric(&self, font: &Font, pick: impl Fn(&FaceMetrics) -> f32, fallback: f32) -> f32 {
        match self.face_metrics(font) {
            Some(m) => pick(&m) / m.units_per_em * font.point_size,
            None => fallback * font.point_size,
        }
    }

    fn layout(&self, text: &str, font: &Font, max_width: Option<f32>) -> Result<RectF, MeasureError> {
        if text.is_empty() {
            return Ok(RectF::default());
        }
        if !font.is_sane() {
            return Err(MeasureError::Backend(format!("unusable font size {}", font.point_size)));
        }
        if !self.has_fonts() {
            return Err(MeasureError::FontUnavailable(self.config.family.clone()));
        }

        let line_height = font.point_size * self.config.line_height_factor;
        let ascent = self.raw_ascent(font);
        let descent = self.raw_descent(font);

        let mut font_system = self.font_system.borrow_mut();
        let metrics = Metrics::new(font.point_size, line_height);
        let attrs = Attrs::new()
            .family(self.family())
            .weight(Self::weight(font))
            .style(Self::style(font));

        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_size(&mut font_system, max_width, None);
        buffer.set_text(&mut font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        let mut lines = 0usize;
        let mut width: f32 = 0.0;
        for run in buffer.layout_runs() {
            lines += 1;
            width = width.max(run.line_w);
        }
        let lines = lines.max(1);
        let height = ascent + descent + (lines - 1) as f32 * line_height;
        log::trace!("laid out {text:?} at {font}: {lines} lines, {width}x{height}");
        Ok(RectF::new(0.0, -ascent, width, height))
    }
}

impl Default for CosmicTextSizing {
    fn default() -> Self {
        Self::new(CosmicSizingConfig::default())
    }
}

impl TextSizing for CosmicTextSizing {
    fn raw_bounding_rect(
        &self,
        text: &str,
        font: &Font,
        max_width: Option<f32>,
    ) -> Result<RectF, MeasureError> {
        if let Some(w) = max_width {
            if !(w > 0.0) {
                return Err(MeasureError::InvalidWidth(w));
            }
        }
        let max_width = max_width.filter(|w| w.is_finite());

        let Some(cache) = &self.cache else {
            return self.layout(text, font, max_width);
        };
        let key = LayoutKey::new(text, font, max_width);
        if let Some(rect) = cache.borrow_mut().get(&key) {
            return Ok(*rect);
        }
        let rect = self.layout(text, font, max_width)?;
        cache.borrow_mut().put(key, rect);
        Ok(rect)
    }

    fn raw_ascent(&self, font: &Font) -> f32 {
        self.metric(font, |m| m.ascender, FALLBACK_ASCENT)
    }

    fn raw_descent(&self, font: &Font) -> f32 {
        // Font units put the descender below zero.
        self.metric(font, |m| -m.descender, FALLBACK_DESCENT)
    }

    fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
