//! Interaction records produced by intersection queries.

use anvil_kernel_math::scalar::{next_float_down, next_float_up};
use anvil_kernel_math::{Normal3, Point2, Point3, Vec3};

use crate::primitive::Primitive;
use crate::ray::{MediumRef, Ray};
use crate::shape::Shape;

/// Fraction of the ray kept when spawning a segment towards a target point,
/// so the segment stops just short of the target surface.
const SHADOW_EPSILON: f64 = 0.0001;

/// A point where light interacts with the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    /// Position of the interaction.
    pub p: Point3,
    /// Time of the interaction.
    pub time: f64,
    /// Conservative absolute error bound on `p`.
    pub p_error: Vec3,
    /// Outgoing direction, the negated incoming ray direction.
    pub wo: Vec3,
    /// Geometric normal. Zero for interactions not on a surface.
    pub n: Normal3,
    /// Medium at the interaction, if any.
    pub medium: Option<MediumRef>,
}

impl Interaction {
    /// Create an interaction.
    pub fn new(
        p: Point3,
        n: Normal3,
        p_error: Vec3,
        wo: Vec3,
        time: f64,
        medium: Option<MediumRef>,
    ) -> Self {
        Self {
            p,
            time,
            p_error,
            wo,
            n,
            medium,
        }
    }

    /// True if this interaction lies on a surface (non-zero normal).
    pub fn is_surface_interaction(&self) -> bool {
        !self.n.is_zero()
    }

    /// Spawn a ray leaving this interaction in direction `d`.
    ///
    /// The origin is pushed outside the error box along the normal so the
    /// new ray cannot re-hit the surface it starts on.
    pub fn spawn_ray(&self, d: &Vec3) -> Ray {
        let o = offset_ray_origin(&self.p, &self.p_error, &self.n, d);
        Ray::with_params(o, *d, f64::INFINITY, self.time, self.medium)
    }

    /// Spawn a ray towards `target`, ending just before it.
    pub fn spawn_ray_to(&self, target: &Point3) -> Ray {
        let o = offset_ray_origin(&self.p, &self.p_error, &self.n, &(target - self.p));
        let d = target - o;
        Ray::with_params(o, d, 1.0 - SHADOW_EPSILON, self.time, self.medium)
    }
}

/// Move `p` out of its error box along `n`, to the side `w` points to, and
/// round each component away from `p`.
pub fn offset_ray_origin(p: &Point3, p_error: &Vec3, n: &Normal3, w: &Vec3) -> Point3 {
    let d = n.abs().dot_vec(p_error);
    let mut offset = n.to_vec() * d;
    if n.dot_vec(w) < 0.0 {
        offset = -offset;
    }
    let mut po = p + offset;
    for axis in 0..3 {
        if offset[axis] > 0.0 {
            po[axis] = next_float_up(po[axis]);
        } else if offset[axis] < 0.0 {
            po[axis] = next_float_down(po[axis]);
        }
    }
    po
}

/// Shading frame of a surface interaction.
///
/// Starts equal to the geometric frame and is replaced by
/// [`SurfaceInteraction::set_shading_geometry`] once bump or interpolated
/// normals are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    /// Shading normal.
    pub n: Normal3,
    /// Shading ∂p/∂u.
    pub dpdu: Vec3,
    /// Shading ∂p/∂v.
    pub dpdv: Vec3,
    /// Shading ∂n/∂u.
    pub dndu: Normal3,
    /// Shading ∂n/∂v.
    pub dndv: Normal3,
}

/// Differential geometry at a ray-surface hit.
///
/// Borrows the shape that produced it, and after a primitive-level query the
/// primitive as well. Both references are non-owning.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInteraction<'a> {
    /// Common interaction data.
    pub interaction: Interaction,
    /// Surface parameterization at the hit.
    pub uv: Point2,
    /// ∂p/∂u.
    pub dpdu: Vec3,
    /// ∂p/∂v.
    pub dpdv: Vec3,
    /// ∂n/∂u.
    pub dndu: Normal3,
    /// ∂n/∂v.
    pub dndv: Normal3,
    /// Shape that was hit.
    pub shape: Option<&'a dyn Shape>,
    /// Primitive that was hit, set by [`Primitive::intersect`].
    pub primitive: Option<&'a dyn Primitive>,
    /// Shading frame.
    pub shading: Shading,
}

impl<'a> SurfaceInteraction<'a> {
    /// Build a surface interaction from the surface partial derivatives.
    ///
    /// The geometric normal is `normalize(dpdu × dpdv)`, flipped (together
    /// with the initial shading normal) when the shape's reverse-orientation
    /// flag and its transform's handedness swap disagree.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3,
        p_error: Vec3,
        uv: Point2,
        wo: Vec3,
        dpdu: Vec3,
        dpdv: Vec3,
        dndu: Normal3,
        dndv: Normal3,
        time: f64,
        shape: Option<&'a dyn Shape>,
    ) -> Self {
        let mut n = Normal3::from_vec(&dpdu.cross(&dpdv).normalize());
        if flips_normal(shape) {
            n = -n;
        }
        Self {
            interaction: Interaction::new(p, n, p_error, wo, time, None),
            uv,
            dpdu,
            dpdv,
            dndu,
            dndv,
            shape,
            primitive: None,
            shading: Shading {
                n,
                dpdu,
                dpdv,
                dndu,
                dndv,
            },
        }
    }

    /// Geometric normal.
    #[inline]
    pub fn n(&self) -> Normal3 {
        self.interaction.n
    }

    /// Hit position.
    #[inline]
    pub fn p(&self) -> Point3 {
        self.interaction.p
    }

    /// Replace the shading frame.
    ///
    /// The new shading normal comes from `dpdus × dpdvs` with the same
    /// orientation flip as the geometric normal. The two normals are then
    /// forced into one hemisphere: when `authoritative` the geometric normal
    /// follows the shading normal, otherwise the shading normal follows the
    /// geometric one.
    pub fn set_shading_geometry(
        &mut self,
        dpdus: Vec3,
        dpdvs: Vec3,
        dndus: Normal3,
        dndvs: Normal3,
        authoritative: bool,
    ) {
        let mut ns = Normal3::from_vec(&dpdus.cross(&dpdvs).normalize());
        if flips_normal(self.shape) {
            ns = -ns;
        }
        if authoritative {
            self.interaction.n = self.interaction.n.face_forward(&ns.to_vec());
        } else {
            ns = ns.face_forward(&self.interaction.n.to_vec());
        }
        self.shading = Shading {
            n: ns,
            dpdu: dpdus,
            dpdv: dpdvs,
            dndu: dndus,
            dndv: dndvs,
        };
    }

    /// Spawn a ray leaving the hit point in direction `d`.
    pub fn spawn_ray(&self, d: &Vec3) -> Ray {
        self.interaction.spawn_ray(d)
    }
}

fn flips_normal(shape: Option<&dyn Shape>) -> bool {
    shape.is_some_and(|s| {
        let data = s.data();
        data.reverse_orientation ^ data.transform_swaps_handedness
    })
}
