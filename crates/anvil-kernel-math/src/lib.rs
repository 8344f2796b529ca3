#![warn(missing_docs)]

//! Math types for the anvil ray tracing kernel.
//!
//! Thin wrappers around nalgebra providing the geometric vocabulary of the
//! tracer: points, vectors, a distinct normal type, transforms with cached
//! inverses, bounding boxes, and the rounding-error helpers used for robust
//! intersection.
//!
//! # Architecture
//!
//! - [`Vec3`], [`Point3`], [`Vec2`], [`Point2`] - nalgebra aliases
//! - [`Normal3`] - surface normal, transformed by the inverse transpose
//! - [`Transform`] - 4×4 matrix paired with its inverse
//! - [`Bounds3`], [`Bounds2`] - axis-aligned boxes
//! - [`scalar`] - `gamma`, `lerp`, `quadratic` and friends

use nalgebra::{Vector2, Vector3};

pub mod bounds;
pub mod error;
pub mod normal;
pub mod scalar;
pub mod transform;
pub mod vector;

pub use bounds::{Bounds2, Bounds3};
pub use error::{MathError, Result};
pub use normal::{face_forward, Normal3};
pub use scalar::{clamp, gamma, lerp, quadratic, radians, MACHINE_EPSILON};
pub use transform::Transform;
pub use vector::{
    abs_dot, coordinate_system, distance, distance_squared, lerp_point, max_point, min_point,
};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;
