//! Surface normals.
//!
//! [`Normal3`] wraps a [`Vec3`] but is a separate type: normals transform by
//! the inverse transpose, so mixing the two up silently breaks orthogonality
//! under non-uniform scale. Conversions are explicit and there is no `Deref`
//! to the inner vector.

use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub};

use crate::Vec3;

/// A surface normal in 3D space. Not necessarily unit length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Normal3(Vec3);

impl Normal3 {
    /// Create a normal from components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// The zero normal, used to mark interactions that are not on a surface.
    pub fn zero() -> Self {
        Self(Vec3::zeros())
    }

    /// Reinterpret a vector as a normal.
    pub fn from_vec(v: &Vec3) -> Self {
        Self(*v)
    }

    /// Reinterpret this normal as a vector.
    pub fn to_vec(&self) -> Vec3 {
        self.0
    }

    /// Borrow the components as a vector.
    pub fn as_vec(&self) -> &Vec3 {
        &self.0
    }

    /// X component.
    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    /// Y component.
    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// Z component.
    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// True if every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// True if any component is NaN.
    pub fn has_nan(&self) -> bool {
        self.0.iter().any(|c| c.is_nan())
    }

    /// Squared length.
    pub fn norm_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Length.
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Unit-length copy. A zero normal yields NaN components.
    pub fn normalize(&self) -> Self {
        Self(self.0 / self.0.norm())
    }

    /// Dot product with another normal.
    pub fn dot(&self, other: &Normal3) -> f64 {
        self.0.dot(&other.0)
    }

    /// Dot product with a vector.
    pub fn dot_vec(&self, v: &Vec3) -> f64 {
        self.0.dot(v)
    }

    /// Absolute value of the dot product with a vector.
    pub fn abs_dot_vec(&self, v: &Vec3) -> f64 {
        self.dot_vec(v).abs()
    }

    /// Cross product with a vector.
    pub fn cross_vec(&self, v: &Vec3) -> Vec3 {
        self.0.cross(v)
    }

    /// Component-wise absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Smallest component.
    pub fn min_component(&self) -> f64 {
        self.0.min()
    }

    /// Largest component.
    pub fn max_component(&self) -> f64 {
        self.0.max()
    }

    /// Flip this normal so it lies in the same hemisphere as `v`.
    ///
    /// The result always satisfies `result · v >= 0`.
    pub fn face_forward(&self, v: &Vec3) -> Self {
        if self.dot_vec(v) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

/// Flip `n` so that it has a non-negative dot product with `v`.
pub fn face_forward(n: &Normal3, v: &Vec3) -> Normal3 {
    n.face_forward(v)
}

impl Add for Normal3 {
    type Output = Normal3;

    fn add(self, rhs: Normal3) -> Normal3 {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Normal3 {
    fn add_assign(&mut self, rhs: Normal3) {
        self.0 += rhs.0;
    }
}

impl Sub for Normal3 {
    type Output = Normal3;

    fn sub(self, rhs: Normal3) -> Normal3 {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Normal3 {
    type Output = Normal3;

    fn mul(self, s: f64) -> Normal3 {
        Self(self.0 * s)
    }
}

impl Mul<Normal3> for f64 {
    type Output = Normal3;

    fn mul(self, n: Normal3) -> Normal3 {
        n * self
    }
}

impl MulAssign<f64> for Normal3 {
    fn mul_assign(&mut self, s: f64) {
        self.0 *= s;
    }
}

impl Div<f64> for Normal3 {
    type Output = Normal3;

    fn div(self, s: f64) -> Normal3 {
        Self(self.0 / s)
    }
}

impl Neg for Normal3 {
    type Output = Normal3;

    fn neg(self) -> Normal3 {
        Self(-self.0)
    }
}

impl Index<usize> for Normal3 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}
