//! Error types for shape construction.

use thiserror::Error;

/// Errors raised when validating shape parameters.
///
/// Intersection queries never fail; a miss is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Radius is zero, negative or not finite.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Sweep angle outside (0, 360] degrees.
    #[error("phi_max must be in (0, 360] degrees, got {0}")]
    InvalidPhiMax(f64),

    /// The z clipping planes leave nothing of the sphere.
    #[error("z range [{z_min}, {z_max}] does not intersect the sphere")]
    EmptyZRange {
        /// Requested lower clip plane.
        z_min: f64,
        /// Requested upper clip plane.
        z_max: f64,
    },
}

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, ShapeError>;
