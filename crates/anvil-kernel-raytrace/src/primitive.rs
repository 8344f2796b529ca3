//! Primitives: shapes bound to appearance data.

use std::sync::Arc;

use anvil_kernel_math::Bounds3;

use crate::interaction::SurfaceInteraction;
use crate::ray::{MediumRef, Ray};
use crate::shape::Shape;

/// Handle to a material owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialRef(pub u32);

/// Handle to an area light owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AreaLightRef(pub u32);

/// Something a ray can hit that also knows how the surface looks.
///
/// Acceleration structures hold primitives and call `intersect` with a ray
/// whose `t_max` shrinks as closer hits are found.
pub trait Primitive: Send + Sync + std::fmt::Debug {
    /// Bounding box in world space.
    fn world_bound(&self) -> Bounds3;

    /// Closest hit within `(0, ray.t_max)`. On a hit `ray.t_max` is narrowed
    /// to the hit parameter and the interaction records this primitive.
    fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction<'_>>;

    /// Whether anything is hit within `(0, ray.t_max)`.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// Material of the surface, if any.
    fn material(&self) -> Option<MaterialRef>;

    /// Area light attached to the surface, if any.
    fn area_light(&self) -> Option<AreaLightRef>;
}

/// A single shape with its material, emission and enclosing medium.
#[derive(Debug, Clone)]
pub struct GeometricPrimitive {
    shape: Arc<dyn Shape>,
    material: Option<MaterialRef>,
    area_light: Option<AreaLightRef>,
    medium: Option<MediumRef>,
}

impl GeometricPrimitive {
    /// Create a primitive with no medium of its own.
    pub fn new(
        shape: Arc<dyn Shape>,
        material: Option<MaterialRef>,
        area_light: Option<AreaLightRef>,
    ) -> Self {
        Self {
            shape,
            material,
            area_light,
            medium: None,
        }
    }

    /// Set the medium reported at hits on this primitive.
    pub fn with_medium(mut self, medium: MediumRef) -> Self {
        self.medium = Some(medium);
        self
    }

    /// The underlying shape.
    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3 {
        self.shape.world_bound()
    }

    fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        let hit = self.shape.intersect(ray)?;
        ray.t_max = hit.t_hit;
        let prim: &dyn Primitive = self;
        let mut si = hit.interaction;
        si.primitive = Some(prim);
        // Without a medium of its own the primitive is transparent to media.
        si.interaction.medium = self.medium.or(ray.medium);
        Some(si)
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.shape.intersect_p(ray)
    }

    fn material(&self) -> Option<MaterialRef> {
        self.material
    }

    fn area_light(&self) -> Option<AreaLightRef> {
        self.area_light
    }
}
