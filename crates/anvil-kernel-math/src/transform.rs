//! Affine transforms with a cached inverse.
//!
//! Points, vectors and normals each follow their own law:
//! - points get the full homogeneous transform and a perspective divide,
//! - vectors only see the upper 3×3 block,
//! - normals use the transpose of the inverse, which keeps them
//!   perpendicular to transformed tangents.

use std::ops::Mul;

use nalgebra::Matrix4;

use crate::bounds::Bounds3;
use crate::error::{MathError, Result};
use crate::normal::Normal3;
use crate::scalar::{gamma, radians};
use crate::{Point3, Vec3};

/// A 4×4 affine transform paired with its inverse.
///
/// Invariant: `m_inv * m ≈ I`, except for transforms built from a singular
/// matrix through [`Transform::from_matrix`], where `m_inv` is the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    m: Matrix4<f64>,
    m_inv: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
            m_inv: Matrix4::identity(),
        }
    }

    /// Build from a forward matrix, inverting it.
    ///
    /// A singular matrix gets the identity as its inverse and a warning is
    /// logged. Use [`Transform::try_from_matrix`] to reject it instead.
    pub fn from_matrix(m: Matrix4<f64>) -> Self {
        match m.try_inverse() {
            Some(m_inv) => Self { m, m_inv },
            None => {
                tracing::warn!("singular transform matrix, falling back to identity inverse");
                Self {
                    m,
                    m_inv: Matrix4::identity(),
                }
            }
        }
    }

    /// Build from a forward matrix, failing if it cannot be inverted.
    pub fn try_from_matrix(m: Matrix4<f64>) -> Result<Self> {
        m.try_inverse()
            .map(|m_inv| Self { m, m_inv })
            .ok_or(MathError::SingularMatrix)
    }

    /// Build from a matrix and an inverse the caller already knows.
    pub fn with_inverse(m: Matrix4<f64>, m_inv: Matrix4<f64>) -> Self {
        Self { m, m_inv }
    }

    /// Translation by `delta`.
    pub fn translate(delta: &Vec3) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = delta.x;
        m[(1, 3)] = delta.y;
        m[(2, 3)] = delta.z;
        let mut m_inv = Matrix4::identity();
        m_inv[(0, 3)] = -delta.x;
        m_inv[(1, 3)] = -delta.y;
        m_inv[(2, 3)] = -delta.z;
        Self { m, m_inv }
    }

    /// Non-uniform scale by `(sx, sy, sz)`. A zero factor yields an
    /// infinite inverse.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let m = Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz));
        let m_inv = Matrix4::new_nonuniform_scaling(&Vec3::new(1.0 / sx, 1.0 / sy, 1.0 / sz));
        Self { m, m_inv }
    }

    /// Rotation about the X axis by `theta` degrees.
    pub fn rotate_x(theta: f64) -> Self {
        let (s, c) = radians(theta).sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self::rotation(m)
    }

    /// Rotation about the Y axis by `theta` degrees.
    pub fn rotate_y(theta: f64) -> Self {
        let (s, c) = radians(theta).sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self::rotation(m)
    }

    /// Rotation about the Z axis by `theta` degrees.
    pub fn rotate_z(theta: f64) -> Self {
        let (s, c) = radians(theta).sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self::rotation(m)
    }

    /// Rotation about an arbitrary axis through the origin by `theta` degrees.
    ///
    /// Uses Rodrigues' rotation formula. The axis is normalized first.
    pub fn rotate(theta: f64, axis: &Vec3) -> Self {
        let a = axis.normalize();
        let (s, c) = radians(theta).sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (a.x, a.y, a.z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self::rotation(m)
    }

    // Orthonormal matrices invert by transposition.
    fn rotation(m: Matrix4<f64>) -> Self {
        Self {
            m,
            m_inv: m.transpose(),
        }
    }

    /// World-to-camera transform for a camera at `pos` looking at `look`.
    ///
    /// Not guarded: if `look - pos` is parallel to `up` the frame is
    /// degenerate and the matrix fills with NaN. A debug diagnostic is
    /// emitted in that case; [`Transform::try_look_at`] reports it as an
    /// error instead.
    pub fn look_at(pos: &Point3, look: &Point3, up: &Vec3) -> Self {
        let camera_to_world = look_at_frame(pos, look, up);
        if camera_to_world.iter().any(|v| v.is_nan()) {
            tracing::debug!(?pos, ?look, "look_at: camera frame is NaN");
        }
        let world_to_camera = camera_to_world
            .try_inverse()
            .unwrap_or_else(|| Matrix4::from_element(f64::NAN));
        Self {
            m: world_to_camera,
            m_inv: camera_to_world,
        }
    }

    /// Like [`Transform::look_at`] but rejects a direction parallel to `up`.
    pub fn try_look_at(pos: &Point3, look: &Point3, up: &Vec3) -> Result<Self> {
        let dir = (look - pos).normalize();
        if up.normalize().cross(&dir).norm_squared() == 0.0 {
            return Err(MathError::DegenerateLookAt);
        }
        Ok(Self::look_at(pos, look, up))
    }

    /// The forward matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.m
    }

    /// The cached inverse matrix.
    pub fn inverse_matrix(&self) -> &Matrix4<f64> {
        &self.m_inv
    }

    /// Inverse transform. Swaps the cached matrices, no inversion happens.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Transposed transform.
    pub fn transpose(&self) -> Self {
        Self {
            m: self.m.transpose(),
            m_inv: self.m_inv.transpose(),
        }
    }

    /// Compose: `self` then `other` (self * other), so `other` applies first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            m: self.m * other.m,
            m_inv: other.m_inv * self.m_inv,
        }
    }

    /// True if the forward matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.m == Matrix4::identity()
    }

    /// True if any basis vector changes squared length by more than 0.1%.
    pub fn has_scale(&self) -> bool {
        let not_one = |x: f64| !(0.999..=1.001).contains(&x);
        not_one(self.apply_vec(&Vec3::x()).norm_squared())
            || not_one(self.apply_vec(&Vec3::y()).norm_squared())
            || not_one(self.apply_vec(&Vec3::z()).norm_squared())
    }

    /// True if the transform flips coordinate-system handedness, i.e. the
    /// upper 3×3 block has a negative determinant.
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.m;
        let det = m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]);
        det < 0.0
    }

    /// Transform a point, dividing by the homogeneous weight unless it is 1.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let (xp, yp, zp, wp) = self.homogeneous(p);
        if wp == 1.0 {
            Point3::new(xp, yp, zp)
        } else {
            Point3::new(xp / wp, yp / wp, zp / wp)
        }
    }

    /// Transform a point and bound the absolute rounding error of the result.
    ///
    /// The bound is `γ(3)` times the sum of the absolute partial products for
    /// each output axis. A zero homogeneous weight is reported through a
    /// debug diagnostic and the undivided point is returned.
    pub fn apply_point_with_error(&self, p: &Point3) -> (Point3, Vec3) {
        let m = &self.m;
        let (x, y, z) = (p.x, p.y, p.z);
        let abs_sum = |r: usize| {
            (m[(r, 0)] * x).abs() + (m[(r, 1)] * y).abs() + (m[(r, 2)] * z).abs() + m[(r, 3)].abs()
        };
        let error = Vec3::new(abs_sum(0), abs_sum(1), abs_sum(2)) * gamma(3);
        (self.divide_checked(p), error)
    }

    /// Transform a point that already carries an absolute error `p_error`,
    /// returning the point and the combined error bound.
    pub fn apply_point_with_abs_error(&self, p: &Point3, p_error: &Vec3) -> (Point3, Vec3) {
        let m = &self.m;
        let (x, y, z) = (p.x, p.y, p.z);
        let g3 = gamma(3);
        let row = |r: usize| {
            (g3 + 1.0)
                * (m[(r, 0)].abs() * p_error.x
                    + m[(r, 1)].abs() * p_error.y
                    + m[(r, 2)].abs() * p_error.z)
                + g3 * ((m[(r, 0)] * x).abs()
                    + (m[(r, 1)] * y).abs()
                    + (m[(r, 2)] * z).abs()
                    + m[(r, 3)].abs())
        };
        let error = Vec3::new(row(0), row(1), row(2));
        (self.divide_checked(p), error)
    }

    /// Transform a direction vector (ignores translation, applies rotation/scale).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[(0, 0)] * v.x + m[(0, 1)] * v.y + m[(0, 2)] * v.z,
            m[(1, 0)] * v.x + m[(1, 1)] * v.y + m[(1, 2)] * v.z,
            m[(2, 0)] * v.x + m[(2, 1)] * v.y + m[(2, 2)] * v.z,
        )
    }

    /// Transform a normal by the transpose of the cached inverse.
    pub fn apply_normal(&self, n: &Normal3) -> Normal3 {
        let mi = &self.m_inv;
        let v = n.as_vec();
        Normal3::new(
            mi[(0, 0)] * v.x + mi[(1, 0)] * v.y + mi[(2, 0)] * v.z,
            mi[(0, 1)] * v.x + mi[(1, 1)] * v.y + mi[(2, 1)] * v.z,
            mi[(0, 2)] * v.x + mi[(1, 2)] * v.y + mi[(2, 2)] * v.z,
        )
    }

    /// Bounds of the transformed box: union of all eight transformed
    /// corners. Conservative, not the tightest possible box.
    pub fn apply_bounds(&self, b: &Bounds3) -> Bounds3 {
        (0..8).fold(Bounds3::empty(), |acc, i| {
            acc.union_point(&self.apply_point(&b.corner(i)))
        })
    }

    fn homogeneous(&self, p: &Point3) -> (f64, f64, f64, f64) {
        let m = &self.m;
        let (x, y, z) = (p.x, p.y, p.z);
        (
            m[(0, 0)] * x + m[(0, 1)] * y + m[(0, 2)] * z + m[(0, 3)],
            m[(1, 0)] * x + m[(1, 1)] * y + m[(1, 2)] * z + m[(1, 3)],
            m[(2, 0)] * x + m[(2, 1)] * y + m[(2, 2)] * z + m[(2, 3)],
            m[(3, 0)] * x + m[(3, 1)] * y + m[(3, 2)] * z + m[(3, 3)],
        )
    }

    fn divide_checked(&self, p: &Point3) -> Point3 {
        let (xp, yp, zp, wp) = self.homogeneous(p);
        if wp == 1.0 {
            Point3::new(xp, yp, zp)
        } else if wp == 0.0 {
            tracing::debug!(?p, "homogeneous weight is zero, not dividing");
            Point3::new(xp, yp, zp)
        } else {
            Point3::new(xp / wp, yp / wp, zp / wp)
        }
    }
}

fn look_at_frame(pos: &Point3, look: &Point3, up: &Vec3) -> Matrix4<f64> {
    let dir = (look - pos).normalize();
    let left = up.normalize().cross(&dir).normalize();
    let new_up = dir.cross(&left);
    let mut m = Matrix4::identity();
    for r in 0..3 {
        m[(r, 0)] = left[r];
        m[(r, 1)] = new_up[r];
        m[(r, 2)] = dir[r];
        m[(r, 3)] = pos[r];
    }
    m
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        self.then(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.apply_point(&p), p);
        assert!(t.is_identity());
        assert!(!t.has_scale());
    }

    #[test]
    fn test_translation() {
        let t = Transform::translate(&Vec3::new(10.0, 20.0, 30.0));
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(t.apply_point(&p), Point3::new(11.0, 22.0, 33.0));
        // Vectors ignore translation.
        assert_eq!(t.apply_vec(&Vec3::x()), Vec3::x());
        let back = t.inverse().apply_point(&t.apply_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_scale() {
        let t = Transform::scale(2.0, 3.0, 4.0);
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_relative_eq!(t.apply_point(&p), Point3::new(2.0, 3.0, 4.0));
        assert!(t.has_scale());
        assert!(!t.swaps_handedness());
        assert!(Transform::scale(-1.0, 1.0, 1.0).swaps_handedness());
    }

    #[test]
    fn test_rotate_z_90() {
        let t = Transform::rotate_z(90.0);
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert!(!t.has_scale());
    }

    #[test]
    fn test_rotate_x_and_y_are_right_handed() {
        let p = Transform::rotate_x(90.0).apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        let p = Transform::rotate_y(90.0).apply_point(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_about_axis() {
        // Rotate (1,0,0) by 90° about Z → (0,1,0)
        let t = Transform::rotate(90.0, &Vec3::z());
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        // 180° about (1,1,0) swaps x and y; the axis need not be unit length.
        let t2 = Transform::rotate(180.0, &Vec3::new(1.0, 1.0, 0.0));
        let r2 = t2.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(r2, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        let back = t2.inverse().apply_point(&r2);
        assert_relative_eq!(back, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compose() {
        let translate = Transform::translate(&Vec3::new(1.0, 0.0, 0.0));
        let scale = Transform::scale(2.0, 2.0, 2.0);
        // scale.then(translate) applies translate first.
        let composed = scale.then(&translate);
        let moved = composed.apply_point(&Point3::origin());
        assert_relative_eq!(moved, Point3::new(2.0, 0.0, 0.0));
        let via_mul = &scale * &translate;
        assert_eq!(via_mul, composed);
        let p = Point3::new(3.0, -1.0, 2.0);
        assert_relative_eq!(
            composed.inverse().apply_point(&composed.apply_point(&p)),
            p,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_inverse_swaps_matrices() {
        let t = Transform::translate(&Vec3::new(1.0, 2.0, 3.0));
        let inv = t.inverse();
        assert_eq!(inv.matrix(), t.inverse_matrix());
        assert_eq!(inv.inverse(), t);
    }

    #[test]
    fn test_transpose() {
        let t = Transform::translate(&Vec3::new(1.0, 2.0, 3.0)).transpose();
        assert_eq!(t.matrix()[(3, 0)], 1.0);
        assert_eq!(t.inverse_matrix()[(3, 2)], -3.0);
    }

    #[test]
    fn test_singular_matrix_falls_back_to_identity_inverse() {
        let t = Transform::from_matrix(Matrix4::zeros());
        assert_eq!(t.inverse_matrix(), &Matrix4::identity());
        assert_eq!(
            Transform::try_from_matrix(Matrix4::zeros()),
            Err(MathError::SingularMatrix)
        );
    }

    #[test]
    fn test_from_matrix_inverts() {
        let m = Transform::scale(2.0, 4.0, 8.0).matrix().to_owned();
        let t = Transform::from_matrix(m);
        assert_relative_eq!(t.inverse_matrix()[(1, 1)], 0.25);
        assert!(Transform::try_from_matrix(m).is_ok());
    }

    #[test]
    fn test_normal_uses_inverse_transpose() {
        // Non-uniform scale: tangent (1, 1, 0) with normal (1, -1, 0).
        let t = Transform::scale(2.0, 1.0, 1.0);
        let tangent = t.apply_vec(&Vec3::new(1.0, 1.0, 0.0));
        let normal = t.apply_normal(&Normal3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(normal.dot_vec(&tangent), 0.0, epsilon = 1e-12);

        // Naively scaling the normal as a vector breaks orthogonality.
        let naive = t.apply_vec(&Vec3::new(1.0, -1.0, 0.0));
        assert!(naive.dot(&tangent).abs() > 1.0);
    }

    #[test]
    fn test_point_error_bound() {
        let t = Transform::translate(&Vec3::new(1.0, 0.0, 0.0));
        let (p, err) = t.apply_point_with_error(&Point3::new(2.0, -3.0, 0.0));
        assert_relative_eq!(p, Point3::new(3.0, -3.0, 0.0));
        assert_relative_eq!(err.x, gamma(3) * 3.0);
        assert_relative_eq!(err.y, gamma(3) * 3.0);
        assert_eq!(err.z, 0.0);

        let carried = Vec3::new(1e-3, 0.0, 0.0);
        let (_, err2) = t.apply_point_with_abs_error(&Point3::new(2.0, -3.0, 0.0), &carried);
        assert!(err2.x > 1e-3);
        assert_eq!(err2.z, 0.0);
    }

    #[test]
    fn test_zero_weight_does_not_panic() {
        let mut m = Matrix4::identity();
        m[(3, 3)] = 0.0;
        let t = Transform::with_inverse(m, Matrix4::identity());
        let (p, _) = t.apply_point_with_error(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_perspective_divide() {
        let mut m = Matrix4::identity();
        m[(3, 3)] = 2.0;
        let t = Transform::from_matrix(m);
        let p = t.apply_point(&Point3::new(2.0, 4.0, 6.0));
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_apply_bounds() {
        let b = Bounds3::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let t = Transform::rotate_z(45.0);
        let tb = t.apply_bounds(&b);
        let s = 2.0_f64.sqrt();
        assert_relative_eq!(tb.p_max.x, s, epsilon = 1e-12);
        assert_relative_eq!(tb.p_min.y, -s, epsilon = 1e-12);
        assert_relative_eq!(tb.p_max.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_look_at() {
        let pos = Point3::new(0.0, 0.0, -5.0);
        let t = Transform::look_at(&pos, &Point3::origin(), &Vec3::y());
        // The eye maps to the camera origin and the target lies on +z.
        assert_relative_eq!(t.apply_point(&pos), Point3::origin(), epsilon = 1e-12);
        let target = t.apply_point(&Point3::origin());
        assert_relative_eq!(target, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_look_at_parallel_up() {
        let pos = Point3::origin();
        let look = Point3::new(0.0, 3.0, 0.0);
        assert_eq!(
            Transform::try_look_at(&pos, &look, &Vec3::y()),
            Err(MathError::DegenerateLookAt)
        );
        let t = Transform::look_at(&pos, &look, &Vec3::y());
        assert!(t.apply_point(&Point3::new(1.0, 1.0, 1.0)).x.is_nan());
    }
}
