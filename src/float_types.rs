//! Scalar type and the tolerant comparisons used throughout the crate.

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Tolerance governing all coordinate comparisons.
///
/// This value has been tuned so that single-precision arithmetic can be
/// substituted for double-precision. If it is made smaller then the polygon
/// clipping code breaks, e.g. by creating zero-length edges after failing to
/// recognise equal vertex coordinates. It is part of the public contract:
/// two coordinates closer than `EPSILON` are indistinguishable.
pub const EPSILON: Real = 1e-3;

/// Machine infinity of the active scalar type.
#[cfg(feature = "f32")]
pub const COORD_INF: Real = f32::INFINITY;
/// Machine infinity of the active scalar type.
#[cfg(feature = "f64")]
pub const COORD_INF: Real = f64::INFINITY;

/// Tolerant equality: `|a - b| < EPSILON`.
#[inline]
pub fn coord_equal(a: Real, b: Real) -> bool {
    (a - b).abs() < EPSILON
}

/// Tolerant strict less-than: `b - a >= EPSILON`.
///
/// `!coord_less_than(a, b)` is not the same relation as
/// `coord_less_than(b, a) || coord_equal(a, b)`; the two predicates have
/// asymmetric dead bands and callers pick whichever bias they need.
#[inline]
pub fn coord_less_than(a: Real, b: Real) -> bool {
    b - a >= EPSILON
}
