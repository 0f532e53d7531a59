//! Error types for leafstitch-stitch

use thiserror::Error;

/// Errors that can occur during composition
#[derive(Debug, Error)]
pub enum StitchError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafstitch_core::Error),

    /// Alignment library error
    #[error("alignment error: {0}")]
    Align(#[from] leafstitch_align::AlignError),

    /// Nothing to stitch
    #[error("no images to stitch")]
    NoImages,

    /// The progress callback requested cancellation
    #[error("stitch cancelled")]
    Cancelled,

    /// The composite canvas would exceed the pixel budget
    #[error("composite canvas too large: {width}x{height}")]
    CanvasTooLarge { width: u64, height: u64 },

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for composition operations
pub type StitchResult<T> = Result<T, StitchError>;
