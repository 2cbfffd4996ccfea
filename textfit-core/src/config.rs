//! Fit engine configuration.
//!
//! Passed explicitly into every fit call; there is no process-wide default
//! instance.

use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// Tunables for the font-fit engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Strings at most this many chars long always get the full
    /// single-line fit, whatever the cheap heuristic predicts.
    pub dont_bother_length: usize,
    /// Iteration cap for the single-line shrink refinement.
    pub single_line_max_depth: u32,
    /// Depth cap for the multi-line bisection.
    pub multi_line_max_depth: u32,
    /// Fraction of the base size the engine may shrink to in order to keep
    /// text on one line. Values >= 1 disable the single-line preference.
    pub single_line_shrink_ratio: f32,
    /// Hard lower bound for multi-line fitting, except when even one line
    /// at this size is taller than the available height.
    pub minimum_font_size: i32,
    /// `chars * point_size < factor * width` predicts a single-line fit.
    pub heuristic_width_factor: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            dont_bother_length: 20,
            single_line_max_depth: 3,
            multi_line_max_depth: 10,
            single_line_shrink_ratio: 1.0,
            minimum_font_size: 8,
            heuristic_width_factor: 1.5,
        }
    }
}

impl FitConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, FitError> {
        let config: FitConfig =
            serde_json::from_str(json).map_err(|e| FitError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, FitError> {
        serde_json::to_string_pretty(self).map_err(|e| FitError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), FitError> {
        if self.single_line_max_depth == 0 {
            return Err(FitError::InvalidConfig("single_line_max_depth must be positive".into()));
        }
        if self.multi_line_max_depth == 0 {
            return Err(FitError::InvalidConfig("multi_line_max_depth must be positive".into()));
        }
        if !(self.single_line_shrink_ratio > 0.0) {
            return Err(FitError::InvalidConfig(format!(
                "single_line_shrink_ratio must be positive, got {}",
                self.single_line_shrink_ratio
            )));
        }
        if self.minimum_font_size < 1 {
            return Err(FitError::InvalidConfig(format!(
                "minimum_font_size must be at least 1, got {}",
                self.minimum_font_size
            )));
        }
        if !(self.heuristic_width_factor > 0.0) || !self.heuristic_width_factor.is_finite() {
            return Err(FitError::InvalidConfig(format!(
                "heuristic_width_factor must be positive and finite, got {}",
                self.heuristic_width_factor
            )));
        }
        Ok(())
    }

    pub fn with_shrink_ratio(mut self, ratio: f32) -> Self {
        self.single_line_shrink_ratio = ratio;
        self
    }

    pub fn with_minimum_font_size(mut self, size: i32) -> Self {
        self.minimum_font_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FitConfig::default();
        assert_eq!(config.dont_bother_length, 20);
        assert_eq!(config.multi_line_max_depth, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = FitConfig::from_json(r#"{ "single_line_shrink_ratio": 0.8 }"#).unwrap();
        assert_eq!(config.single_line_shrink_ratio, 0.8);
        assert_eq!(config.minimum_font_size, 8);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            FitConfig::from_json(r#"{ "multi_line_max_depth": 0 }"#),
            Err(FitError::InvalidConfig(_))
        ));
        assert!(FitConfig::from_json(r#"{ "single_line_shrink_ratio": -1.0 }"#).is_err());
        assert!(FitConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = FitConfig::default().with_shrink_ratio(0.5).with_minimum_font_size(10);
        let json = config.to_json().unwrap();
        assert_eq!(FitConfig::from_json(&json).unwrap(), config);
    }
}
