//! Error types for leafstitch-align

use thiserror::Error;

/// Errors that can occur during alignment operations
#[derive(Debug, Error)]
pub enum AlignError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafstitch_core::Error),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Empty input sequence
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Offset list does not match the image list
    #[error("offset count mismatch: {expected} images but {actual} offsets")]
    OffsetCountMismatch { expected: usize, actual: usize },
}

/// Result type for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;
