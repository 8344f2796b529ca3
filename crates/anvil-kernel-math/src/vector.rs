//! Free functions over vectors and points that nalgebra does not spell the
//! way the tracer uses them.

use crate::{Point2, Point3, Vec3};

/// Absolute value of the dot product.
#[inline]
pub fn abs_dot(a: &Vec3, b: &Vec3) -> f64 {
    a.dot(b).abs()
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm()
}

/// Squared distance between two points.
#[inline]
pub fn distance_squared(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm_squared()
}

/// Distance between two 2D points.
#[inline]
pub fn distance2(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Affine combination `(1 - t)·a + t·b`.
///
/// Weights sum to one, so the result is a well-defined point.
#[inline]
pub fn lerp_point(t: f64, a: &Point3, b: &Point3) -> Point3 {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}

/// Reorder the components of `v` as `(v[x], v[y], v[z])`.
#[inline]
pub fn permute(v: &Vec3, x: usize, y: usize, z: usize) -> Vec3 {
    Vec3::new(v[x], v[y], v[z])
}

/// Component-wise absolute value of a vector.
#[inline]
pub fn abs(v: &Vec3) -> Vec3 {
    v.abs()
}

/// True if any component of the vector is NaN.
#[inline]
pub fn has_nan(v: &Vec3) -> bool {
    v.iter().any(|c| c.is_nan())
}

/// Component-wise minimum of two points.
#[inline]
pub fn min_point(a: &Point3, b: &Point3) -> Point3 {
    a.inf(b)
}

/// Component-wise maximum of two points.
#[inline]
pub fn max_point(a: &Point3, b: &Point3) -> Point3 {
    a.sup(b)
}

/// Round every coordinate down.
#[inline]
pub fn floor(p: &Point3) -> Point3 {
    p.map(f64::floor)
}

/// Round every coordinate up.
#[inline]
pub fn ceil(p: &Point3) -> Point3 {
    p.map(f64::ceil)
}

/// Build two vectors that together with unit vector `v1` form an
/// orthonormal basis.
pub fn coordinate_system(v1: &Vec3) -> (Vec3, Vec3) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vec3::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vec3::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}
