//! Partial spheres: clipped in z and swept through an angle about the z axis.

use std::f64::consts::PI;

use anvil_kernel_math::{clamp, gamma, quadratic, radians, Bounds3, Normal3, Point2, Point3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use crate::shape::{Shape, ShapeData, SurfaceHit};
use crate::transform::RayTransform;

/// Scene-description parameters for a sphere.
///
/// Missing fields take their defaults, so `{}` is a full unit sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    /// Radius in object space.
    pub radius: f64,
    /// Lower clip plane; defaults to `-radius`.
    pub z_min: Option<f64>,
    /// Upper clip plane; defaults to `radius`.
    pub z_max: Option<f64>,
    /// Sweep angle in degrees.
    pub phi_max: f64,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            z_min: None,
            z_max: None,
            phi_max: 360.0,
        }
    }
}

impl SphereParams {
    /// Check the parameters describe a non-empty surface.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ShapeError::InvalidRadius(self.radius));
        }
        if !(self.phi_max > 0.0 && self.phi_max <= 360.0) {
            return Err(ShapeError::InvalidPhiMax(self.phi_max));
        }
        let (z_min, z_max) = self.z_range();
        if z_min.max(z_max) <= -self.radius || z_min.min(z_max) >= self.radius || z_min == z_max {
            return Err(ShapeError::EmptyZRange { z_min, z_max });
        }
        Ok(())
    }

    fn z_range(&self) -> (f64, f64) {
        (
            self.z_min.unwrap_or(-self.radius),
            self.z_max.unwrap_or(self.radius),
        )
    }
}

/// A sphere centered at the object-space origin.
///
/// Parameterized by `phi` about the z axis (`u = phi / phi_max`) and by the
/// polar angle `theta` between the clip planes (`v` runs from `z_min` to
/// `z_max`).
#[derive(Debug, Clone)]
pub struct Sphere {
    data: ShapeData,
    radius: f64,
    z_min: f64,
    z_max: f64,
    theta_min: f64,
    theta_max: f64,
    phi_max: f64,
}

/// Root of the sphere quadratic that survived clipping.
struct Candidate {
    t: f64,
    p: Point3,
    phi: f64,
}

impl Sphere {
    /// Create a sphere.
    ///
    /// The clip planes are ordered and clamped to `[-radius, radius]`, and
    /// `phi_max_deg` is clamped to `[0, 360]`. No further validation is done;
    /// use [`Sphere::from_params`] for untrusted input.
    pub fn new(data: ShapeData, radius: f64, z_min: f64, z_max: f64, phi_max_deg: f64) -> Self {
        let lo = clamp(z_min.min(z_max), -radius, radius);
        let hi = clamp(z_min.max(z_max), -radius, radius);
        if lo != z_min.min(z_max)
            || hi != z_min.max(z_max)
            || !(0.0..=360.0).contains(&phi_max_deg)
        {
            debug!(radius, z_min, z_max, phi_max_deg, "sphere parameters clamped");
        }
        Self {
            data,
            radius,
            z_min: lo,
            z_max: hi,
            theta_min: clamp(lo / radius, -1.0, 1.0).acos(),
            theta_max: clamp(hi / radius, -1.0, 1.0).acos(),
            phi_max: radians(clamp(phi_max_deg, 0.0, 360.0)),
        }
    }

    /// A complete sphere of the given radius.
    pub fn full(data: ShapeData, radius: f64) -> Self {
        Self::new(data, radius, -radius, radius, 360.0)
    }

    /// Create a sphere from validated scene parameters.
    pub fn from_params(data: ShapeData, params: &SphereParams) -> Result<Self> {
        params.validate()?;
        let (z_min, z_max) = params.z_range();
        Ok(Self::new(data, params.radius, z_min, z_max, params.phi_max))
    }

    /// Radius in object space.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Clip planes after clamping, as `(z_min, z_max)`.
    pub fn z_bounds(&self) -> (f64, f64) {
        (self.z_min, self.z_max)
    }

    /// Sweep angle in radians.
    pub fn phi_max(&self) -> f64 {
        self.phi_max
    }

    /// Hit point and azimuth for parameter `t` of an object-space ray.
    fn hit_at(&self, ray: &Ray, t: f64) -> (Point3, f64) {
        let mut p = ray.at(t);
        // Reproject onto the surface to shed the error of evaluating the ray.
        p = Point3::from(p.coords * (self.radius / p.coords.norm()));
        if p.x == 0.0 && p.y == 0.0 {
            p.x = 1e-5 * self.radius;
        }
        let mut phi = p.y.atan2(p.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        (p, phi)
    }

    fn is_clipped(&self, p: &Point3, phi: f64) -> bool {
        (self.z_min > -self.radius && p.z < self.z_min)
            || (self.z_max < self.radius && p.z > self.z_max)
            || phi > self.phi_max
    }

    /// Nearest root in `(0, t_max]` whose point survives clipping.
    fn find_hit(&self, ray: &Ray) -> Option<Candidate> {
        let o = ray.origin().coords;
        let d = ray.direction();
        let a = d.norm_squared();
        let b = 2.0 * d.dot(&o);
        let c = o.norm_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;

        if t0 > ray.t_max || t1 <= 0.0 {
            return None;
        }
        let mut t = t0;
        if t <= 0.0 {
            t = t1;
            if t > ray.t_max {
                return None;
            }
        }

        let (mut p, mut phi) = self.hit_at(ray, t);
        if self.is_clipped(&p, phi) {
            if t == t1 || t1 > ray.t_max {
                return None;
            }
            t = t1;
            (p, phi) = self.hit_at(ray, t);
            if self.is_clipped(&p, phi) {
                return None;
            }
        }
        Some(Candidate { t, p, phi })
    }
}

impl Shape for Sphere {
    fn data(&self) -> &ShapeData {
        &self.data
    }

    fn object_bound(&self) -> Bounds3 {
        Bounds3::new(
            Point3::new(-self.radius, -self.radius, self.z_min),
            Point3::new(self.radius, self.radius, self.z_max),
        )
    }

    fn intersect(&self, r: &Ray) -> Option<SurfaceHit<'_>> {
        let ray = self.data.world_to_object.apply_ray(r);
        let Candidate { t, p, phi } = self.find_hit(&ray)?;

        let u = phi / self.phi_max;
        let theta = clamp(p.z / self.radius, -1.0, 1.0).acos();
        let d_theta = self.theta_max - self.theta_min;
        let v = (theta - self.theta_min) / d_theta;

        let z_radius = (p.x * p.x + p.y * p.y).sqrt();
        let cos_phi = p.x / z_radius;
        let sin_phi = p.y / z_radius;
        let dpdu = Vec3::new(-self.phi_max * p.y, self.phi_max * p.x, 0.0);
        let dpdv = Vec3::new(p.z * cos_phi, p.z * sin_phi, -self.radius * theta.sin()) * d_theta;

        let d2pduu = Vec3::new(p.x, p.y, 0.0) * (-self.phi_max * self.phi_max);
        let d2pduv = Vec3::new(-sin_phi, cos_phi, 0.0) * (d_theta * p.z * self.phi_max);
        let d2pdvv = p.coords * (-d_theta * d_theta);

        // Weingarten equations.
        let e1 = dpdu.dot(&dpdu);
        let f1 = dpdu.dot(&dpdv);
        let g1 = dpdv.dot(&dpdv);
        let n = dpdu.cross(&dpdv).normalize();
        let e2 = n.dot(&d2pduu);
        let f2 = n.dot(&d2pduv);
        let g2 = n.dot(&d2pdvv);
        let inv = 1.0 / (e1 * g1 - f1 * f1);
        let dndu = Normal3::from_vec(
            &(dpdu * ((f2 * f1 - e2 * g1) * inv) + dpdv * ((e2 * f1 - f2 * e1) * inv)),
        );
        let dndv = Normal3::from_vec(
            &(dpdu * ((g2 * f1 - f2 * g1) * inv) + dpdv * ((f2 * f1 - g2 * e1) * inv)),
        );

        let p_error = p.coords.abs() * gamma(5);
        let shape: &dyn Shape = self;
        let local = SurfaceInteraction::new(
            p,
            p_error,
            Point2::new(u, v),
            -ray.direction(),
            dpdu,
            dpdv,
            dndu,
            dndv,
            ray.time,
            Some(shape),
        );

        Some(SurfaceHit {
            t_hit: t,
            interaction: self.data.object_to_world.apply_surface_interaction(&local),
        })
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        let ray = self.data.world_to_object.apply_ray(r);
        self.find_hit(&ray).is_some()
    }

    fn area(&self) -> f64 {
        self.phi_max * self.radius * (self.z_max - self.z_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_kernel_math::Transform;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn at(t: Transform) -> ShapeData {
        ShapeData::new(Arc::new(t), false)
    }

    fn unit() -> Sphere {
        Sphere::full(at(Transform::identity()), 1.0)
    }

    #[test]
    fn test_hit_from_outside() {
        let s = unit();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = s.intersect(&ray).unwrap();
        assert_relative_eq!(hit.t_hit, 4.0, epsilon = 1e-9);
        assert_relative_eq!(hit.interaction.p().z, 1.0, epsilon = 1e-9);
        let n = hit.interaction.n();
        assert_relative_eq!(n.z(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.interaction.interaction.wo, Vec3::z(), epsilon = 1e-12);
        assert!(s.intersect_p(&ray));
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let s = unit();
        let ray = Ray::new(Point3::origin(), Vec3::x());
        let hit = s.intersect(&ray).unwrap();
        assert_relative_eq!(hit.t_hit, 1.0, epsilon = 1e-9);
        assert_relative_eq!(hit.interaction.n().x(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_miss() {
        let s = unit();
        let ray = Ray::new(Point3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.intersect(&ray).is_none());
        assert!(!s.intersect_p(&ray));
        // Pointing away.
        let away = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::z());
        assert!(s.intersect(&away).is_none());
    }

    #[test]
    fn test_tangent_ray_from_surface_misses() {
        let s = unit();
        // a·t² = 0: both roots are zero, so nothing lies ahead of the origin.
        let ray = Ray::new(Point3::new(1.0, 0.0, 0.0), Vec3::y());
        assert!(s.intersect(&ray).is_none());
        assert!(!s.intersect_p(&ray));
    }

    #[test]
    fn test_t_max_limits_hits() {
        let s = unit();
        let ray = Ray::with_params(Point3::new(0.0, 0.0, 5.0), -Vec3::z(), 3.5, 0.0, None);
        assert!(s.intersect(&ray).is_none());
        assert!(!s.intersect_p(&ray));
        let ray = Ray::with_params(Point3::new(0.0, 0.0, 5.0), -Vec3::z(), 4.5, 0.0, None);
        assert!(s.intersect(&ray).is_some());
    }

    #[test]
    fn test_uv_and_tangents() {
        let s = unit();
        let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), -Vec3::y());
        let si = s.intersect(&ray).unwrap().interaction;
        assert_relative_eq!(si.uv.x, 0.25, epsilon = 1e-9);
        assert_relative_eq!(si.uv.y, 0.5, epsilon = 1e-9);
        assert_relative_eq!(si.dpdu, Vec3::new(-2.0 * PI, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(si.dpdv, Vec3::new(0.0, 0.0, PI), epsilon = 1e-9);
        assert_relative_eq!(si.n().y(), 1.0, epsilon = 1e-9);
        assert!(si.shape.is_some());
        assert!(si.primitive.is_none());
    }

    #[test]
    fn test_pole_hit_has_finite_partials() {
        let s = Sphere::full(at(Transform::identity()), 2.0);
        for dir in [-Vec3::z(), Vec3::z()] {
            let ray = Ray::new(Point3::origin() - dir * 5.0, dir);
            let si = s.intersect(&ray).unwrap().interaction;
            // The hit is moved off the axis in x, never along z.
            assert_relative_eq!(si.p().x, 2e-5, epsilon = 1e-12);
            assert_eq!(si.p().y, 0.0);
            for v in [si.dpdu, si.dpdv, si.dndu.to_vec(), si.dndv.to_vec()] {
                assert!(v.iter().all(|c| c.is_finite()), "{v:?}");
            }
            assert!(!si.n().has_nan());
            assert!(si.n().dot_vec(&dir) < 0.0);
            assert_relative_eq!(si.dndv.to_vec(), si.dpdv / 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_normal_derivatives_match_curvature() {
        let s = Sphere::full(at(Transform::identity()), 2.0);
        let ray = Ray::new(Point3::new(5.0, 0.6, 0.8), -Vec3::x());
        let si = s.intersect(&ray).unwrap().interaction;
        // n = p / r, so dn/du = dp/du / r.
        assert_relative_eq!(si.dndu.to_vec(), si.dpdu / 2.0, epsilon = 1e-9);
        assert_relative_eq!(si.dndv.to_vec(), si.dpdv / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_phi_clip_retries_far_root() {
        let s = Sphere::new(at(Transform::identity()), 1.0, -1.0, 1.0, 180.0);
        // Near hit at phi = 3π/2 is swept away, far hit at phi = π/2 is kept.
        let ray = Ray::new(Point3::new(0.0, -5.0, 0.0), Vec3::y());
        let hit = s.intersect(&ray).unwrap();
        assert_relative_eq!(hit.t_hit, 6.0, epsilon = 1e-9);
        assert_relative_eq!(hit.interaction.p().y, 1.0, epsilon = 1e-9);
        assert!(s.intersect_p(&ray));

        // Far root beyond t_max.
        let short = Ray::with_params(Point3::new(0.0, -5.0, 0.0), Vec3::y(), 5.0, 0.0, None);
        assert!(s.intersect(&short).is_none());
    }

    #[test]
    fn test_z_clip_both_roots() {
        let s = Sphere::new(at(Transform::identity()), 1.0, -0.5, 0.5, 360.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vec3::z());
        assert!(s.intersect(&ray).is_none());
        let side = Ray::new(Point3::new(5.0, 0.0, 0.0), -Vec3::x());
        assert_relative_eq!(s.intersect(&side).unwrap().t_hit, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constructor_orders_and_clamps() {
        let s = Sphere::new(at(Transform::identity()), 2.0, 5.0, -1.0, 400.0);
        assert_eq!(s.z_bounds(), (-1.0, 2.0));
        assert_relative_eq!(s.phi_max(), 2.0 * PI);
        assert_eq!(s.radius(), 2.0);
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(unit().area(), 4.0 * PI, epsilon = 1e-12);
        let half = Sphere::new(at(Transform::identity()), 1.0, 0.0, 1.0, 360.0);
        assert_relative_eq!(half.area(), 2.0 * PI, epsilon = 1e-12);
        let wedge = Sphere::new(at(Transform::identity()), 2.0, -2.0, 2.0, 90.0);
        assert_relative_eq!(wedge.area(), 4.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_bounds() {
        let s = Sphere::full(at(Transform::translate(&Vec3::new(1.0, 2.0, 3.0))), 1.0);
        assert_eq!(
            s.object_bound(),
            Bounds3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
        );
        let wb = s.world_bound();
        assert_relative_eq!(wb.p_min, Point3::new(0.0, 1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(wb.p_max, Point3::new(2.0, 3.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_translated_sphere_hit_in_world_space() {
        let s = Sphere::full(at(Transform::translate(&Vec3::new(0.0, 0.0, -10.0))), 1.0);
        let ray = Ray::new(Point3::origin(), -Vec3::z());
        let hit = s.intersect(&ray).unwrap();
        assert_relative_eq!(hit.t_hit, 9.0, epsilon = 1e-9);
        // The pole hit is nudged off the z axis by 1e-5 of the radius.
        let p = hit.interaction.p();
        assert_relative_eq!(p, Point3::new(0.0, 0.0, -9.0), epsilon = 1e-4);
        assert_relative_eq!(hit.interaction.n().z(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reverse_orientation_flips_normal() {
        let s = Sphere::full(ShapeData::new(Arc::new(Transform::identity()), true), 1.0);
        let ray = Ray::new(Point3::new(5.0, 0.0, 0.0), -Vec3::x());
        let si = s.intersect(&ray).unwrap().interaction;
        assert_relative_eq!(si.n().x(), -1.0, epsilon = 1e-9);
        assert_eq!(si.shading.n, si.n());
    }

    #[test]
    fn test_mirror_and_reverse_cancel() {
        let mirror = Arc::new(Transform::scale(-1.0, 1.0, 1.0));
        let s = Sphere::full(ShapeData::new(mirror, true), 1.0);
        let ray = Ray::new(Point3::new(5.0, 0.0, 0.0), -Vec3::x());
        let si = s.intersect(&ray).unwrap().interaction;
        assert_relative_eq!(si.n().x(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: SphereParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, SphereParams::default());
        let s = Sphere::from_params(at(Transform::identity()), &params).unwrap();
        assert_eq!(s.z_bounds(), (-1.0, 1.0));

        let params: SphereParams =
            serde_json::from_str(r#"{"radius": 2.0, "z_max": 1.0, "phi_max": 90.0}"#).unwrap();
        let s = Sphere::from_params(at(Transform::identity()), &params).unwrap();
        assert_eq!(s.z_bounds(), (-2.0, 1.0));
        assert_relative_eq!(s.phi_max(), PI / 2.0);
    }

    #[test]
    fn test_params_validation() {
        let bad = SphereParams {
            radius: -1.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ShapeError::InvalidRadius(-1.0)));

        let bad = SphereParams {
            phi_max: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(ShapeError::InvalidPhiMax(0.0)));

        let bad = SphereParams {
            z_min: Some(2.0),
            z_max: Some(3.0),
            ..Default::default()
        };
        assert!(matches!(
            Sphere::from_params(at(Transform::identity()), &bad),
            Err(ShapeError::EmptyZRange { .. })
        ));
    }
}
