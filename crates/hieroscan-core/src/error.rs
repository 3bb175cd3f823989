//! Error types for hieroscan.
//!
//! Provides [`HieroError`] for fatal errors that stop processing. The
//! recognition pipeline itself has no transient failure modes: once a
//! [`FontInfo`](crate::FontInfo) has been validated, transcription of an
//! image always produces an encoding (possibly empty).

use std::fmt;

/// Fatal error types for sign recognition.
#[derive(Debug, Clone, PartialEq)]
pub enum HieroError {
    /// The prototype database is malformed or inconsistent.
    InvalidModel(String),
    /// Two vectors that must agree in length do not.
    DimensionMismatch {
        /// What was being checked (e.g., "core embedding of sign 3").
        context: String,
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },
    /// A requested region lies (partly) outside the page.
    RegionOutOfBounds {
        /// The requested region, as `(x, y, width, height)`.
        region: (u32, u32, u32, u32),
        /// The page size, as `(width, height)`.
        page: (u32, u32),
    },
}

impl fmt::Display for HieroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HieroError::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
            HieroError::DimensionMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "dimension mismatch in {context} (expected: {expected}, actual: {actual})"
            ),
            HieroError::RegionOutOfBounds { region, page } => write!(
                f,
                "region {},{} {}x{} lies outside the {}x{} page",
                region.0, region.1, region.2, region.3, page.0, page.1
            ),
        }
    }
}

impl std::error::Error for HieroError {}
