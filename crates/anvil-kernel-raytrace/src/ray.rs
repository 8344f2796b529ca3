//! Ray representation and ray-box slab tests.

use anvil_kernel_math::{gamma, Bounds3, Point3, Vec3};

/// Opaque handle to a participating medium owned by the scene.
///
/// The kernel never dereferences it; rays and interactions carry it through
/// unchanged for the volume integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediumRef(pub u32);

/// A ray in 3D space defined by origin and direction.
///
/// The direction is not normalized. `t_max` bounds the valid segment and is
/// narrowed by whoever owns the ray as closer hits are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    /// Precomputed reciprocal of direction components for fast slab tests.
    inv_direction: Vec3,
    /// Sign of direction components (0 if positive, 1 if negative).
    sign: [usize; 3],
    /// Upper bound of the valid parametric range.
    pub t_max: f64,
    /// Time the ray was cast, for motion blur.
    pub time: f64,
    /// Medium containing the origin, if any.
    pub medium: Option<MediumRef>,
}

impl Ray {
    /// Create an unbounded ray at time zero in no medium.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self::with_params(origin, direction, f64::INFINITY, 0.0, None)
    }

    /// Create a ray with every field given.
    pub fn with_params(
        origin: Point3,
        direction: Vec3,
        t_max: f64,
        time: f64,
        medium: Option<MediumRef>,
    ) -> Self {
        let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        let sign = [
            usize::from(inv.x < 0.0),
            usize::from(inv.y < 0.0),
            usize::from(inv.z < 0.0),
        ];
        Self {
            origin,
            direction,
            inv_direction: inv,
            sign,
            t_max,
            time,
            medium,
        }
    }

    /// Origin point.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Component-wise reciprocal of the direction. Zero components give ±∞.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Slab test against a box, clipped to `[0, t_max]`.
    ///
    /// Returns the entry and exit parameters, or `None` if the ray misses.
    /// The cached direction signs pick the near and far plane of each slab,
    /// and the test stops as soon as the running interval is empty. A zero
    /// direction component gives an infinite reciprocal, so an origin inside
    /// that slab yields `(-∞, +∞)` and leaves the interval untouched, while an
    /// origin outside it yields an empty interval. An origin exactly on the
    /// slab plane gives `0 · ∞ = NaN`, which the comparisons below ignore, so
    /// the closed slab counts as inside.
    pub fn intersect_bounds(&self, bounds: &Bounds3) -> Option<(f64, f64)> {
        // Widen the exit to cover rounding in the products.
        let widen = 1.0 + 2.0 * gamma(3);
        let mut t0 = 0.0;
        let mut t1 = self.t_max;
        for axis in 0..3 {
            let inv = self.inv_direction[axis];
            let near = (bounds[self.sign[axis]][axis] - self.origin[axis]) * inv;
            let far = (bounds[1 - self.sign[axis]][axis] - self.origin[axis]) * inv * widen;
            if near > t0 {
                t0 = near;
            }
            if far < t1 {
                t1 = far;
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Boolean form of [`Ray::intersect_bounds`] for traversal loops that
    /// only need to know whether a node is hit before `t_max`.
    #[inline]
    pub fn hits_bounds(&self, bounds: &Bounds3) -> bool {
        self.intersect_bounds(bounds).is_some()
    }
}

/// A ray with two auxiliary rays offset by one pixel in x and y on the film.
///
/// The footprint the three rays cut on a surface lets texture lookups pick a
/// filter width. The auxiliary rays are only meaningful when
/// `has_differentials` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayDifferential {
    /// The primary ray.
    pub ray: Ray,
    /// Whether the auxiliary rays below are valid.
    pub has_differentials: bool,
    /// Origin of the ray offset in x.
    pub rx_origin: Point3,
    /// Origin of the ray offset in y.
    pub ry_origin: Point3,
    /// Direction of the ray offset in x.
    pub rx_direction: Vec3,
    /// Direction of the ray offset in y.
    pub ry_direction: Vec3,
}

impl RayDifferential {
    /// Wrap a ray with no differentials yet.
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            has_differentials: false,
            rx_origin: ray.origin(),
            ry_origin: ray.origin(),
            rx_direction: ray.direction(),
            ry_direction: ray.direction(),
        }
    }

    /// Wrap a ray together with its two auxiliary rays.
    pub fn with_differentials(ray: Ray, rx: (Point3, Vec3), ry: (Point3, Vec3)) -> Self {
        Self {
            ray,
            has_differentials: true,
            rx_origin: rx.0,
            ry_origin: ry.0,
            rx_direction: rx.1,
            ry_direction: ry.1,
        }
    }

    /// Rescale the auxiliary rays for a sample spacing of `s` pixels.
    ///
    /// Offsets from the primary ray are multiplied by `s`; the primary ray is
    /// left alone and `s = 1` changes nothing.
    pub fn scale_differentials(&mut self, s: f64) {
        let o = self.ray.origin();
        let d = self.ray.direction();
        self.rx_origin = o + (self.rx_origin - o) * s;
        self.ry_origin = o + (self.ry_origin - o) * s;
        self.rx_direction = d + (self.rx_direction - d) * s;
        self.ry_direction = d + (self.ry_direction - d) * s;
    }
}

impl From<Ray> for RayDifferential {
    fn from(ray: Ray) -> Self {
        Self::new(ray)
    }
}
