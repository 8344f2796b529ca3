//! Axis-aligned bounding boxes in 2D and 3D.
//!
//! An empty box has `p_min = +∞` and `p_max = -∞` on every axis, so the
//! first union with a real point or box produces that point or box exactly.

use std::ops::Index;

use crate::scalar::lerp;
use crate::{Point2, Point3, Vec2, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    /// Minimum corner.
    pub p_min: Point3,
    /// Maximum corner.
    pub p_max: Point3,
}

impl Bounds3 {
    /// Box spanning two arbitrary corners (ordered per axis).
    pub fn new(p0: Point3, p1: Point3) -> Self {
        Self {
            p_min: p0.inf(&p1),
            p_max: p0.sup(&p1),
        }
    }

    /// Degenerate box holding a single point.
    pub fn from_point(p: Point3) -> Self {
        Self { p_min: p, p_max: p }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            p_min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            p_max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if `p_min > p_max` on any axis.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    /// One of the eight corners. Bit 0 of `i` selects x, bit 1 y, bit 2 z;
    /// a set bit picks the maximum.
    pub fn corner(&self, i: usize) -> Point3 {
        Point3::new(
            self[i & 1].x,
            self[(i >> 1) & 1].y,
            self[(i >> 2) & 1].z,
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Containment test that excludes the upper faces.
    pub fn contains_exclusive(&self, p: &Point3) -> bool {
        p.x >= self.p_min.x
            && p.x < self.p_max.x
            && p.y >= self.p_min.y
            && p.y < self.p_max.y
            && p.z >= self.p_min.z
            && p.z < self.p_max.z
    }

    /// Vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vec3 {
        self.p_max - self.p_min
    }

    /// Total area of the six faces.
    pub fn surface_area(&self) -> f64 {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    /// Index of the longest axis (0 = x, 1 = y, 2 = z).
    pub fn max_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Map box-local coordinates in `[0, 1]³` to a point in the box.
    pub fn lerp(&self, t: &Point3) -> Point3 {
        Point3::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
            lerp(t.z, self.p_min.z, self.p_max.z),
        )
    }

    /// Position of `p` relative to the box: `p_min` maps to `(0,0,0)`,
    /// `p_max` to `(1,1,1)`. Flat axes keep the raw offset.
    pub fn offset(&self, p: &Point3) -> Vec3 {
        let mut o = p - self.p_min;
        for axis in 0..3 {
            if self.p_max[axis] > self.p_min[axis] {
                o[axis] /= self.p_max[axis] - self.p_min[axis];
            }
        }
        o
    }

    /// Center and radius of a sphere enclosing the box.
    ///
    /// The radius is zero when the computed center falls outside the box,
    /// which only happens for empty or non-finite boxes.
    pub fn bounding_sphere(&self) -> (Point3, f64) {
        let center = Point3::from((self.p_min.coords + self.p_max.coords) / 2.0);
        let radius = if self.contains(&center) {
            (self.p_max - center).norm()
        } else {
            0.0
        };
        (center, radius)
    }

    /// Smallest box containing this box and `p`.
    pub fn union_point(&self, p: &Point3) -> Self {
        Self {
            p_min: self.p_min.inf(p),
            p_max: self.p_max.sup(p),
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bounds3) -> Self {
        Self {
            p_min: self.p_min.inf(&other.p_min),
            p_max: self.p_max.sup(&other.p_max),
        }
    }

    /// Overlapping region of the two boxes; empty if they are disjoint.
    pub fn intersection(&self, other: &Bounds3) -> Self {
        Self {
            p_min: self.p_min.sup(&other.p_min),
            p_max: self.p_max.inf(&other.p_max),
        }
    }

    /// Test if two boxes overlap (touching counts as overlap).
    pub fn overlaps(&self, other: &Bounds3) -> bool {
        let x = self.p_max.x >= other.p_min.x && self.p_min.x <= other.p_max.x;
        let y = self.p_max.y >= other.p_min.y && self.p_min.y <= other.p_max.y;
        let z = self.p_max.z >= other.p_min.z && self.p_min.z <= other.p_max.z;
        x && y && z
    }

    /// Box padded by `delta` on every side.
    pub fn expand(&self, delta: f64) -> Self {
        let d = Vec3::new(delta, delta, delta);
        Self {
            p_min: self.p_min - d,
            p_max: self.p_max + d,
        }
    }
}

impl Default for Bounds3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Bounds3 {
    type Output = Point3;

    /// `0` is the minimum corner, `1` the maximum.
    fn index(&self, i: usize) -> &Point3 {
        debug_assert!(i < 2, "Bounds3 index out of range: {i}");
        if i == 0 {
            &self.p_min
        } else {
            &self.p_max
        }
    }
}

/// Axis-aligned bounding box in 2D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Minimum corner.
    pub p_min: Point2,
    /// Maximum corner.
    pub p_max: Point2,
}

impl Bounds2 {
    /// Box spanning two arbitrary corners.
    pub fn new(p0: Point2, p1: Point2) -> Self {
        Self {
            p_min: p0.inf(&p1),
            p_max: p0.sup(&p1),
        }
    }

    /// Degenerate box holding a single point.
    pub fn from_point(p: Point2) -> Self {
        Self { p_min: p, p_max: p }
    }

    /// Empty (inverted) box.
    pub fn empty() -> Self {
        Self {
            p_min: Point2::new(f64::INFINITY, f64::INFINITY),
            p_max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// True if `p_min > p_max` on either axis.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y
    }

    /// One of the four corners, bit-decoded like [`Bounds3::corner`].
    pub fn corner(&self, i: usize) -> Point2 {
        Point2::new(self[i & 1].x, self[(i >> 1) & 1].y)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.p_min.x && p.x <= self.p_max.x && p.y >= self.p_min.y && p.y <= self.p_max.y
    }

    /// Containment test that excludes the upper edges.
    pub fn contains_exclusive(&self, p: &Point2) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    /// Vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vec2 {
        self.p_max - self.p_min
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Index of the longer axis.
    pub fn max_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y {
            0
        } else {
            1
        }
    }

    /// Map box-local coordinates in `[0, 1]²` into the box.
    pub fn lerp(&self, t: &Point2) -> Point2 {
        Point2::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
        )
    }

    /// Position of `p` relative to the box corners.
    pub fn offset(&self, p: &Point2) -> Vec2 {
        let mut o = p - self.p_min;
        for axis in 0..2 {
            if self.p_max[axis] > self.p_min[axis] {
                o[axis] /= self.p_max[axis] - self.p_min[axis];
            }
        }
        o
    }

    /// Center and radius of a circle enclosing the box.
    pub fn bounding_circle(&self) -> (Point2, f64) {
        let center = Point2::from((self.p_min.coords + self.p_max.coords) / 2.0);
        let radius = if self.contains(&center) {
            (self.p_max - center).norm()
        } else {
            0.0
        };
        (center, radius)
    }

    /// Smallest box containing this box and `p`.
    pub fn union_point(&self, p: &Point2) -> Self {
        Self {
            p_min: self.p_min.inf(p),
            p_max: self.p_max.sup(p),
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Bounds2) -> Self {
        Self {
            p_min: self.p_min.inf(&other.p_min),
            p_max: self.p_max.sup(&other.p_max),
        }
    }

    /// Overlapping region of the two boxes.
    pub fn intersection(&self, other: &Bounds2) -> Self {
        Self {
            p_min: self.p_min.sup(&other.p_min),
            p_max: self.p_max.inf(&other.p_max),
        }
    }

    /// Test if two boxes overlap (touching counts as overlap).
    pub fn overlaps(&self, other: &Bounds2) -> bool {
        let x = self.p_max.x >= other.p_min.x && self.p_min.x <= other.p_max.x;
        let y = self.p_max.y >= other.p_min.y && self.p_min.y <= other.p_max.y;
        x && y
    }

    /// Box padded by `delta` on every side.
    pub fn expand(&self, delta: f64) -> Self {
        let d = Vec2::new(delta, delta);
        Self {
            p_min: self.p_min - d,
            p_max: self.p_max + d,
        }
    }
}

impl Default for Bounds2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for Bounds2 {
    type Output = Point2;

    fn index(&self, i: usize) -> &Point2 {
        debug_assert!(i < 2, "Bounds2 index out of range: {i}");
        if i == 0 {
            &self.p_min
        } else {
            &self.p_max
        }
    }
}
