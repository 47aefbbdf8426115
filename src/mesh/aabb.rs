//! Axis-aligned bounding boxes with projected, tolerance-aware tests.

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use nalgebra::Point3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The degenerate box containing a single point.
    #[inline]
    pub const fn from_point(p: Point3<Real>) -> Self {
        Self { mins: p, maxs: p }
    }

    /// Extend the box to contain `p`.
    pub fn grow(&mut self, p: &Point3<Real>) {
        for dim in 0..3 {
            if p[dim] < self.mins[dim] {
                self.mins[dim] = p[dim];
            }
            if p[dim] > self.maxs[dim] {
                self.maxs[dim] = p[dim];
            }
        }
    }

    /// Tolerant projected point test: true when `p` is inside or within
    /// tolerance of the box on both in-plane axes.
    #[inline]
    pub fn contains_point_xy(&self, p: &Point3<Real>, plane: Plane) -> bool {
        plane.xy_greater_or_equal(p, &self.mins) && plane.xy_greater_or_equal(&self.maxs, p)
    }

    /// Tolerant projected cover test: true when `self` covers `other`.
    #[inline]
    pub fn covers_xy(&self, other: &Aabb, plane: Plane) -> bool {
        plane.xy_greater_or_equal(&other.mins, &self.mins)
            && plane.xy_greater_or_equal(&self.maxs, &other.maxs)
    }

    /// Strict projected overlap test: touching boxes do not overlap.
    #[inline]
    pub fn overlaps_xy(&self, other: &Aabb, plane: Plane) -> bool {
        plane.xy_less_than(&self.mins, &other.maxs) && plane.xy_less_than(&other.mins, &self.maxs)
    }
}
