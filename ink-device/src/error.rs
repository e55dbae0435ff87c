//! Error types for ink-device.

use thiserror::Error;

/// Result type alias using InkError.
pub type InkResult<T> = Result<T, InkError>;

/// Errors that can occur while rendering or writing pages.
#[derive(Debug, Error)]
pub enum InkError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// No font matched the requested family and style.
    #[error("No font found for family '{0}'")]
    FontNotFound(String),

    /// A font file or face could not be loaded.
    #[error("Failed to load font '{family}': {reason}")]
    FontLoad { family: String, reason: String },

    /// A raster image could not be mounted as a pattern.
    #[error("Failed to mount raster: {0}")]
    RasterMount(String),

    /// I/O error while writing a page.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Other image encoding error.
    #[error("Image encoding error: {0}")]
    ImageError(String),
}

impl InkError {
    pub(crate) fn font_load(family: &str, reason: impl ToString) -> Self {
        InkError::FontLoad {
            family: family.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<png::EncodingError> for InkError {
    fn from(err: png::EncodingError) -> Self {
        InkError::PngError(err.to_string())
    }
}

impl From<image::ImageError> for InkError {
    fn from(err: image::ImageError) -> Self {
        InkError::ImageError(err.to_string())
    }
}
