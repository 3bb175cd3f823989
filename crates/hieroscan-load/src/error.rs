//! Error types for loading external artifacts.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Every load failure is
//! fatal: callers are expected to report it before processing any image.

use hieroscan_core::HieroError;
use thiserror::Error;

/// Error type for reading images, models, name tables and region files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A JSON file is malformed or does not match the expected schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A number that should be a Unicode scalar value is not one.
    #[error("invalid code point: {0:#x}")]
    InvalidCodePoint(u32),

    /// An insertion corner name that is not one of ts, bs, te, be, m, t, b.
    #[error("unknown corner: {0}")]
    UnknownCorner(String),

    /// A line of a region file cannot be parsed.
    #[error("region file line {line}: {message}")]
    Region { line: usize, message: String },

    /// The loaded data was rejected by the core library.
    #[error(transparent)]
    Core(#[from] HieroError),
}

impl LoadError {
    pub(crate) fn region(line: usize, message: impl Into<String>) -> Self {
        LoadError::Region {
            line,
            message: message.into(),
        }
    }
}

/// Convert a code point from a data file into a `char`.
pub(crate) fn code_point(value: u32) -> Result<char, LoadError> {
    char::from_u32(value).ok_or(LoadError::InvalidCodePoint(value))
}
