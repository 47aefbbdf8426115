//! Projection planes and the 2D line algebra used for clipping.
//!
//! A [`Plane`] is not a geometric plane but a choice of projection: an
//! ordered triple of distinct axis indices. The `x` and `y` axes carry the
//! in-plane intersection math; the `z` axis is ignored and is chosen as the
//! axis of the largest normal component, so projected edges never collapse.

use crate::float_types::{COORD_INF, Real, coord_equal, coord_less_than};
use nalgebra::{Point3, Vector3};

/// Componentwise tolerant equality of two points.
#[inline]
pub fn points_equal(a: &Point3<Real>, b: &Point3<Real>) -> bool {
    (0..3).all(|dim| coord_equal(a[dim], b[dim]))
}

/// Componentwise tolerant equality of two vectors.
#[inline]
pub fn vectors_equal(a: &Vector3<Real>, b: &Vector3<Real>) -> bool {
    (0..3).all(|dim| coord_equal(a[dim], b[dim]))
}

/// A 2D projection basis: two in-plane axis indices and one ignored axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plane {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Plane {
    /// Choose the projection with the best numerical conditioning for a
    /// polygon with the given normal: the axis of the largest-magnitude
    /// component is ignored, the remaining two keep their numeric order.
    pub fn from_normal(normal: &Vector3<Real>) -> Self {
        let mut biggest = -COORD_INF;
        let mut bd = 0;
        for dim in 0..3 {
            let mag = normal[dim].abs();
            if mag > biggest {
                biggest = mag;
                bd = dim;
            }
        }
        Plane {
            x: if bd == 0 { 2 } else { 0 },
            y: if bd == 1 { 2 } else { 1 },
            z: bd,
        }
    }

    /// The basis with the in-plane `y` axis and the ignored axis exchanged,
    /// used to recover the ignored coordinate of an intersection point.
    #[inline]
    fn swap_yz(self) -> Plane {
        Plane {
            x: self.x,
            y: self.z,
            z: self.y,
        }
    }

    #[inline]
    pub fn x_of(&self, a: &Point3<Real>) -> Real {
        a[self.x]
    }

    #[inline]
    pub fn y_of(&self, a: &Point3<Real>) -> Real {
        a[self.y]
    }

    /// Projected strict less-than on both in-plane axes.
    #[inline]
    pub fn xy_less_than(&self, a: &Point3<Real>, b: &Point3<Real>) -> bool {
        coord_less_than(self.x_of(a), self.x_of(b)) && coord_less_than(self.y_of(a), self.y_of(b))
    }

    /// Projected loose greater-or-equal on both in-plane axes. Not the
    /// negation of [`Plane::xy_less_than`]: both comparisons are inexact.
    #[inline]
    pub fn xy_greater_or_equal(&self, a: &Point3<Real>, b: &Point3<Real>) -> bool {
        !coord_less_than(self.x_of(a), self.x_of(b)) && !coord_less_than(self.y_of(a), self.y_of(b))
    }

    /// Gradient of the projected line through `a` and `b`.
    /// The caller must ensure the projected edge is not vertical.
    pub fn y_gradient(&self, a: &Point3<Real>, b: &Point3<Real>) -> Real {
        let ex = self.x_of(b) - self.x_of(a);
        let ey = self.y_of(b) - self.y_of(a);
        debug_assert!(ex != 0.0, "no vertical lines");
        ey / ex
    }

    /// Intercept of the projected line through `a` with gradient `m`.
    pub fn y_intercept(&self, a: &Point3<Real>, m: Real) -> Real {
        self.y_of(a) - m * self.x_of(a)
    }

    /// Intersect the infinite lines AB and CD in the projection, returning
    /// the intersection as a full 3-space point (the ignored coordinate is
    /// recovered by repeating the algebra in the swapped basis).
    /// Returns `None` for parallel lines.
    pub fn intersect_lines(
        &self,
        va: &Point3<Real>,
        vb: &Point3<Real>,
        vc: &Point3<Real>,
        vd: &Point3<Real>,
    ) -> Option<Point3<Real>> {
        let (ax, ay) = (self.x_of(va), self.y_of(va));
        let (bx, by) = (self.x_of(vb), self.y_of(vb));
        let (cx, cy) = (self.x_of(vc), self.y_of(vc));
        let (dx, dy) = (self.x_of(vd), self.y_of(vd));

        let ix;
        let iy;
        if coord_equal(ax, bx) {
            // AB is vertical: if the lines overlap in the x dimension then
            // there is only one place they could cross.
            ix = ax;

            if coord_equal(cx, dx) {
                // Both lines are vertical so they are parallel.
                return None;
            }

            let m2 = self.y_gradient(vc, vd);
            let c2 = self.y_intercept(vc, m2);
            iy = m2 * ix + c2;
        } else if coord_equal(ay, by) {
            // AB is horizontal.
            iy = ay;

            if coord_equal(cx, dx) {
                ix = cx;
            } else {
                if coord_equal(cy, dy) {
                    // Both lines are horizontal so they are parallel.
                    return None;
                }
                let m2 = self.y_gradient(vc, vd);
                let c2 = self.y_intercept(vc, m2);
                // y = mx + c, so x = (y - c)/m.
                ix = (iy - c2) / m2;
            }
        } else {
            // AB is neither vertical nor horizontal.
            let m1 = self.y_gradient(va, vb);
            let c1 = self.y_intercept(va, m1);

            if coord_equal(cx, dx) {
                ix = cx;
            } else {
                let m2 = self.y_gradient(vc, vd);
                if coord_equal(m1, m2) {
                    return None;
                }
                let c2 = self.y_intercept(vc, m2);
                // Where the two lines have equal y:
                //   (m1 - m2) * x = c2 - c1
                ix = (c2 - c1) / (m1 - m2);
            }

            iy = m1 * ix + c1;
        }

        // Repeat in the xz projection to recover the ignored coordinate.
        let p2 = self.swap_yz();
        let iz = if coord_equal(ax, bx) {
            // AB contributes no gradient; CD cannot also be vertical or we
            // would have returned above.
            let m3 = p2.y_gradient(vc, vd);
            let c3 = p2.y_intercept(vc, m3);
            m3 * ix + c3
        } else {
            let m4 = p2.y_gradient(va, vb);
            let c4 = p2.y_intercept(va, m4);
            m4 * ix + c4
        };

        let mut hit = Point3::origin();
        hit[self.x] = ix;
        hit[self.y] = iy;
        hit[self.z] = iz;
        Some(hit)
    }
}
