//! Error types for preview image rendering.

use thiserror::Error;

use crate::font::FontError;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, OgError>;

/// Errors raised while rendering a preview image.
#[derive(Debug, Error)]
pub enum OgError {
    /// Fonts could not be resolved.
    #[error(transparent)]
    Font(#[from] FontError),

    /// The generated SVG could not be parsed.
    #[error("invalid SVG document: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// The target pixmap could not be allocated.
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}
