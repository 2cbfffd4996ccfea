use thiserror::Error;

/// Failures reported by a [`TextSizing`](crate::sizing::TextSizing) provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Invalid wrap width: {0}")]
    InvalidWidth(f32),
    #[error("Font unavailable: {0}")]
    FontUnavailable(String),
    #[error("Measurement backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the font-fit engine and the attributed-string contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Measurement failed: {0}")]
    Measure(#[from] MeasureError),
    #[error("Invalid drawing font size: {0}")]
    InvalidFontSize(f32),
    #[error("Drawing font size of zero requires empty text")]
    ZeroFontSize,
    #[error("Invalid fit configuration: {0}")]
    InvalidConfig(String),
}
