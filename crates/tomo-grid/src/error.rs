//! Error types for grid loading and resampling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or resampling scattered data.
#[derive(Error, Debug)]
pub enum GridError {
    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token in the input could not be parsed as a number.
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The input file contained no data rows.
    #[error("{0}: no data rows")]
    Empty(PathBuf),

    /// The input has too few columns for coordinates plus payload.
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    /// The cache artifact exists but does not hold a whole grid.
    #[error("cache artifact {path} is corrupt: {message}")]
    BadCache { path: PathBuf, message: String },
}

impl GridError {
    /// Wrap an I/O failure with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a Parse error with a 1-based line number.
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a BadCache error.
    pub fn bad_cache(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::BadCache {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
