//! Auxiliary run metadata: alignment, location, cursor, underline.
//!
//! None of this affects font fitting. It rides along on an
//! [`AttributedString`](crate::AttributedString) for the renderer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::PointF;

// ── Alignment ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlignment {
    /// Left = 0, center = 0.5, right = 1.
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    #[default]
    Baseline,
    Top,
    Center,
    Bottom,
}

impl VerticalAlignment {
    /// Top = 0, center = 0.5, baseline = 0.75, bottom = 1.
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Baseline => 0.75,
            Self::Bottom => 1.0,
        }
    }
}

/// Returned when an alignment name is not recognized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown alignment: {0}")]
pub struct ParseAlignmentError(pub String);

impl FromStr for HorizontalAlignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(ParseAlignmentError(s.to_string())),
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            _ => Err(ParseAlignmentError(s.to_string())),
        }
    }
}

// ── Attribute record ────────────────────────────────────────────────

/// Typed attribute record. Unset fields fall back to the alignment
/// defaults at read time.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Attributes {
    pub location: Option<PointF>,
    pub horizontal_alignment: Option<HorizontalAlignment>,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub cursor_logical_index: Option<usize>,
    /// One flag per char; `true` means underlined.
    pub underline: Option<Vec<bool>>,
    pub tag: Option<String>,
    pub accessibility_label: Option<String>,
    pub ghosted_text: Option<String>,
    pub max_width: Option<f32>,
}

impl Attributes {
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment.unwrap_or_default()
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment.unwrap_or_default()
    }

    /// Marks the char at `index` as underlined, growing the flag list as needed.
    pub fn set_underlined(&mut self, index: usize) {
        let flags = self.underline.get_or_insert_with(Vec::new);
        if flags.len() <= index {
            flags.resize(index + 1, false);
        }
        flags[index] = true;
    }

    pub fn is_underlined(&self, index: usize) -> bool {
        self.underline
            .as_ref()
            .and_then(|flags| flags.get(index).copied())
            .unwrap_or(false)
    }
}
