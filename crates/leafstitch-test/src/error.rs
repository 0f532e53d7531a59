//! Error types for leafstitch-test

use thiserror::Error;

/// Errors that can occur in the test framework
#[derive(Debug, Error)]
pub enum TestError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leafstitch_core::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write a test image
    #[error("failed to write image {path}: {message}")]
    ImageWrite { path: String, message: String },
}

/// Result type for test framework operations
pub type TestResult<T> = Result<T, TestError>;
