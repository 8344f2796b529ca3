//! Error types for fallible transform construction.

use thiserror::Error;

/// Errors reported by the checked transform builders.
///
/// The unchecked builders never fail; they fall back or propagate NaN.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Matrix has no inverse.
    #[error("matrix is singular and has no inverse")]
    SingularMatrix,

    /// Look-at frame could not be built.
    #[error("look-at direction is parallel to the up vector")]
    DegenerateLookAt,
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
