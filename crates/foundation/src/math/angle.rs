//! Degree-based trigonometry.
//!
//! Every angle that crosses a crate boundary is in degrees; radians only show
//! up inside these helpers.

/// Sine of an angle in degrees.
#[inline]
pub fn sind(deg: f64) -> f64 {
    deg.to_radians().sin()
}

/// Cosine of an angle in degrees.
#[inline]
pub fn cosd(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Inverse sine in degrees that never leaves the domain.
///
/// `x` is divided by `max(1, |x|)` first, so rounding that pushes `|x|` a hair
/// past 1 yields ±90 instead of NaN. NaN input still yields NaN.
#[inline]
pub fn safe_asind(x: f64) -> f64 {
    (x / x.abs().max(1.0)).asin().to_degrees()
}

/// Euclidean modulo: the result always has the sign of `n`.
#[inline]
pub fn modulo(a: f64, n: f64) -> f64 {
    a.rem_euclid(n)
}

/// Signed difference `a - b` wrapped into `[-180, 180)`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    modulo(a - b + 180.0, 360.0) - 180.0
}

/// Wrap an angle into `[-180, 180)`.
pub fn wrap_deg(a: f64) -> f64 {
    angle_diff(a, 0.0)
}

/// Three-way sign where zero maps to zero (unlike [`f64::signum`]).
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        // Preserves NaN as well as both zeros.
        x
    }
}
