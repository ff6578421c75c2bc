//! Error types for page rendering.

use thiserror::Error;

/// Errors that can occur while rendering a page.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The radius axis does not match the fixed panel layout.
    #[error("page layout holds {panels} panels but the radius axis has {levels} levels")]
    LayoutMismatch { panels: usize, levels: usize },

    /// A panel's slice length does not match the lat/lon axes.
    #[error("slice has {found} cells, axes imply {expected}")]
    SliceShape { expected: usize, found: usize },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    /// A palette definition could not be parsed.
    #[error("invalid palette: {0}")]
    BadPalette(String),

    /// Writing an output file failed.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
