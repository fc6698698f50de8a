//! Angle and arithmetic helpers.
//!
//! All angles in this crate are in degrees. Headings follow the hub
//! convention of the range (-180, 180], clockwise positive.

/// Values below this magnitude are treated as zero when dividing.
pub const EPSILON: f32 = 1e-6;

/// Normalize a heading into (-180, 180].
///
/// Non-finite input normalizes to 0.
///
/// # Example
/// ```
/// use marga::core::math::normalize_heading;
///
/// assert_eq!(normalize_heading(270.0), -90.0);
/// assert_eq!(normalize_heading(-180.0), 180.0);
/// assert_eq!(normalize_heading(720.0), 0.0);
/// ```
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
///
/// Works with any wraparound representation of the inputs.
///
/// # Example
/// ```
/// use marga::core::math::heading_delta;
///
/// // Crossing the 0/360 seam
/// assert!((heading_delta(359.0, 1.0) - 2.0).abs() < 1e-4);
/// assert!((heading_delta(1.0, 359.0) + 2.0).abs() < 1e-4);
/// ```
#[inline]
pub fn heading_delta(from: f32, to: f32) -> f32 {
    normalize_heading(to - from)
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg.to_radians()
}

/// Division that returns 0 for a negligible divisor or a non-finite result.
#[inline]
pub fn safe_div(numerator: f32, denominator: f32) -> f32 {
    if denominator.abs() < EPSILON {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() { q } else { 0.0 }
}

/// Sign of a value as -1, 0 or 1.
#[inline]
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Whether two signs agree. A zero sign agrees with anything.
#[inline]
pub fn signs_agree(a: i8, b: i8) -> bool {
    a == 0 || b == 0 || a == b
}

/// Turning radius (mm) for a distance travelled over a heading change.
///
/// Returns 0 when the angle is numerically negligible.
#[inline]
pub fn arc_radius(distance_mm: f32, angle_deg: f32) -> f32 {
    safe_div(distance_mm.abs(), deg_to_rad(angle_deg).abs())
}

/// Speed in units per second from a magnitude over a duration in ms.
#[inline]
pub fn rate_per_second(magnitude: f32, duration_ms: u64) -> f32 {
    safe_div(magnitude.abs() * 1000.0, duration_ms as f32)
}
