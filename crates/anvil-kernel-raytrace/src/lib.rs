#![warn(missing_docs)]

//! Rays, surface interactions, shapes and primitives for the anvil ray
//! tracing kernel.
//!
//! Everything here is built on the vector, bounds and transform types of
//! [`anvil_kernel_math`]. Shapes and primitives are immutable once built and
//! are shared across render threads behind `Arc`.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with cached reciprocal direction, slab tests against boxes
//! - [`RayDifferential`] - Ray plus the offset rays used for texture filtering
//! - [`Interaction`] / [`SurfaceInteraction`] - Hit records and spawned rays
//! - [`Shape`] - Intersectable geometry; [`Sphere`] is the built-in shape
//! - [`Primitive`] - A shape bound to material, area light and medium handles
//! - [`RayTransform`] - Transform laws for rays and interactions
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use anvil_kernel_math::{Point3, Transform, Vec3};
//! use anvil_kernel_raytrace::{Ray, Shape, ShapeData, Sphere};
//!
//! let data = ShapeData::new(Arc::new(Transform::identity()), false);
//! let sphere = Sphere::full(data, 1.0);
//!
//! let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = sphere.intersect(&ray).unwrap();
//! assert!((hit.t_hit - 4.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod interaction;
pub mod primitive;
mod ray;
pub mod shape;
pub mod sphere;
pub mod transform;

pub use error::{Result, ShapeError};
pub use interaction::{offset_ray_origin, Interaction, Shading, SurfaceInteraction};
pub use primitive::{AreaLightRef, GeometricPrimitive, MaterialRef, Primitive};
pub use ray::{MediumRef, Ray, RayDifferential};
pub use shape::{Shape, ShapeData, SurfaceHit};
pub use sphere::{Sphere, SphereParams};
pub use transform::RayTransform;
