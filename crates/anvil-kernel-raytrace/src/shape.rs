//! The shape abstraction shared by all intersectable geometry.

use std::sync::Arc;

use anvil_kernel_math::{Bounds3, Transform};

use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;

/// Data every shape carries: its placement in the world and orientation
/// flags.
///
/// `transform_swaps_handedness` is derived once here and never recomputed
/// per query.
#[derive(Debug, Clone)]
pub struct ShapeData {
    /// Object space to world space.
    pub object_to_world: Arc<Transform>,
    /// World space to object space.
    pub world_to_object: Arc<Transform>,
    /// Flip surface normals to point inward.
    pub reverse_orientation: bool,
    /// Whether `object_to_world` mirrors the coordinate system.
    pub transform_swaps_handedness: bool,
}

impl ShapeData {
    /// Shape data for an object-to-world transform; the inverse is taken
    /// from the transform's cached inverse.
    pub fn new(object_to_world: Arc<Transform>, reverse_orientation: bool) -> Self {
        let world_to_object = Arc::new(object_to_world.inverse());
        Self::with_inverse(object_to_world, world_to_object, reverse_orientation)
    }

    /// Shape data for a transform pair the caller already shares between
    /// shapes.
    pub fn with_inverse(
        object_to_world: Arc<Transform>,
        world_to_object: Arc<Transform>,
        reverse_orientation: bool,
    ) -> Self {
        let transform_swaps_handedness = object_to_world.swaps_handedness();
        Self {
            object_to_world,
            world_to_object,
            reverse_orientation,
            transform_swaps_handedness,
        }
    }
}

/// Result of a successful ray-shape intersection.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit<'a> {
    /// Parameter along the ray.
    pub t_hit: f64,
    /// Differential geometry at the hit, in world space.
    pub interaction: SurfaceInteraction<'a>,
}

/// A geometric shape that rays can be tested against.
///
/// Shapes are built once and shared read-only across threads; every query
/// takes `&self`. A miss is `None`, never an error.
pub trait Shape: Send + Sync + std::fmt::Debug {
    /// Placement and orientation data.
    fn data(&self) -> &ShapeData;

    /// Bounding box in object space.
    fn object_bound(&self) -> Bounds3;

    /// Bounding box in world space.
    fn world_bound(&self) -> Bounds3 {
        self.data().object_to_world.apply_bounds(&self.object_bound())
    }

    /// Closest intersection of a world-space ray within `(0, ray.t_max)`.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceHit<'_>>;

    /// Whether the ray hits the shape at all. Shadow rays use this; shapes
    /// with a cheaper test than the full intersection should override it.
    fn intersect_p(&self, ray: &Ray) -> bool {
        self.intersect(ray).is_some()
    }

    /// Surface area in object space.
    fn area(&self) -> f64;
}
