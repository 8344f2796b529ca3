//! Applying transforms to rays and surface interactions.

use anvil_kernel_math::Transform;

use crate::interaction::{Interaction, Shading, SurfaceInteraction};
use crate::ray::{Ray, RayDifferential};

/// Transform laws for the ray tracing types.
///
/// Implemented for [`Transform`], which lives in the math crate and knows
/// nothing about rays.
pub trait RayTransform {
    /// Transform a ray.
    ///
    /// The origin is advanced along the new direction past its rounding-error
    /// box and `t_max` shrinks by the same amount, so a hit found in the
    /// transformed frame is never behind the true origin.
    fn apply_ray(&self, r: &Ray) -> Ray;

    /// Transform a ray and its auxiliary rays.
    fn apply_ray_differential(&self, r: &RayDifferential) -> RayDifferential;

    /// Transform every field of a surface interaction, growing the position
    /// error bound and renormalizing normals.
    fn apply_surface_interaction<'a>(&self, si: &SurfaceInteraction<'a>) -> SurfaceInteraction<'a>;
}

impl RayTransform for Transform {
    fn apply_ray(&self, r: &Ray) -> Ray {
        let (mut o, o_error) = self.apply_point_with_error(&r.origin());
        let d = self.apply_vec(&r.direction());
        let mut t_max = r.t_max;
        let length_squared = d.norm_squared();
        if length_squared > 0.0 {
            let dt = d.abs().dot(&o_error) / length_squared;
            o += d * dt;
            t_max -= dt;
        }
        Ray::with_params(o, d, t_max, r.time, r.medium)
    }

    fn apply_ray_differential(&self, r: &RayDifferential) -> RayDifferential {
        RayDifferential {
            ray: self.apply_ray(&r.ray),
            has_differentials: r.has_differentials,
            rx_origin: self.apply_point(&r.rx_origin),
            ry_origin: self.apply_point(&r.ry_origin),
            rx_direction: self.apply_vec(&r.rx_direction),
            ry_direction: self.apply_vec(&r.ry_direction),
        }
    }

    fn apply_surface_interaction<'a>(&self, si: &SurfaceInteraction<'a>) -> SurfaceInteraction<'a> {
        let it = &si.interaction;
        let (p, p_error) = self.apply_point_with_abs_error(&it.p, &it.p_error);
        let n = self.apply_normal(&it.n).normalize();
        let wo = self.apply_vec(&it.wo).normalize();

        let shading_n = self
            .apply_normal(&si.shading.n)
            .normalize()
            .face_forward(&n.to_vec());

        SurfaceInteraction {
            interaction: Interaction::new(p, n, p_error, wo, it.time, it.medium),
            uv: si.uv,
            dpdu: self.apply_vec(&si.dpdu),
            dpdv: self.apply_vec(&si.dpdv),
            dndu: self.apply_normal(&si.dndu),
            dndv: self.apply_normal(&si.dndv),
            shape: si.shape,
            primitive: si.primitive,
            shading: Shading {
                n: shading_n,
                dpdu: self.apply_vec(&si.shading.dpdu),
                dpdv: self.apply_vec(&si.shading.dpdv),
                dndu: self.apply_normal(&si.shading.dndu),
                dndv: self.apply_normal(&si.shading.dndv),
            },
        }
    }
}
