//! Scalar helpers shared by the geometric code: rounding-error bounds,
//! interpolation, angle conversion and a numerically stable quadratic solver.

/// Machine epsilon used for the conservative rounding-error bounds.
pub const MACHINE_EPSILON: f64 = f64::EPSILON;

/// Conservative bound on the relative error accumulated by `n` floating-point
/// operations: `nε / (1 - nε)`.
#[inline]
pub fn gamma(n: u32) -> f64 {
    let n = f64::from(n);
    (n * MACHINE_EPSILON) / (1.0 - n * MACHINE_EPSILON)
}

/// Linear interpolation between `a` and `b`; `t = 0` gives `a`.
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Clamp `v` into `[lo, hi]`.
///
/// Unlike [`f64::clamp`] this never panics on `lo > hi`; the lower bound wins.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}

/// Degrees to radians.
#[inline]
pub fn radians(deg: f64) -> f64 {
    (std::f64::consts::PI / 180.0) * deg
}

/// Radians to degrees.
#[inline]
pub fn degrees(rad: f64) -> f64 {
    (180.0 / std::f64::consts::PI) * rad
}

/// Solve `a·t² + b·t + c = 0`.
///
/// Returns the two real roots ordered `t0 <= t1`, or `None` when the
/// discriminant is negative or a root is not finite. The sign of `b` selects
/// which root is computed directly so that `-b ± sqrt(disc)` never cancels.
/// `b = c = 0` is the double root at zero.
pub fn quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 {
        return None;
    }
    let root = discrim.sqrt();

    let q = if b < 0.0 {
        -0.5 * (b - root)
    } else {
        -0.5 * (b + root)
    };
    if q == 0.0 {
        // Only reachable with b = 0 and c = 0; c / q would be NaN.
        return Some((0.0, 0.0));
    }
    let mut t0 = q / a;
    let mut t1 = c / q;
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    if !(t0.is_finite() && t1.is_finite()) {
        return None;
    }
    Some((t0, t1))
}

/// Smallest representable `f64` strictly greater than `v`.
///
/// Infinity maps to itself and `-0.0` is treated as `0.0`.
pub fn next_float_up(v: f64) -> f64 {
    if v.is_infinite() && v > 0.0 {
        return v;
    }
    let v = if v == -0.0 { 0.0 } else { v };
    let bits = v.to_bits();
    let bits = if v >= 0.0 { bits + 1 } else { bits - 1 };
    f64::from_bits(bits)
}

/// Largest representable `f64` strictly less than `v`.
pub fn next_float_down(v: f64) -> f64 {
    if v.is_infinite() && v < 0.0 {
        return v;
    }
    let v = if v == 0.0 { -0.0 } else { v };
    let bits = v.to_bits();
    let bits = if v > 0.0 { bits - 1 } else { bits + 1 };
    f64::from_bits(bits)
}
