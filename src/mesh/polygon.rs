//! Polygon primitives: up to [`MAX_SIDES`] vertex indices with a colour, an
//! id, and lazily cached normal and bounding box.

use crate::errors::GeometryError;
use crate::float_types::{Real, coord_equal, coord_less_than};
use crate::mesh::aabb::Aabb;
use crate::mesh::plane::{Plane, points_equal, vectors_equal};
use crate::mesh::vertex::VertexArray;
use nalgebra::Vector3;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Fixed side capacity. A split that would need a 16th side is a hard
/// error rather than a partially committed split.
pub const MAX_SIDES: usize = 15;

/// A closed polygon (or point/line for fewer than 3 sides) referencing
/// vertices by arena index. Side `i` connects the vertex at `i - 1`
/// (wrapping) to the vertex at `i`.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    colour: u32,
    id: u32,
    sides: Vec<usize>,
    /// Lazily computed unit normal; `None` once computed means the first
    /// three vertices are collinear (or there are fewer than three).
    normal: OnceLock<Option<Vector3<Real>>>,
    /// Lazily computed bounding box; `None` once computed means no sides.
    bbox: OnceLock<Option<Aabb>>,
}

enum SplitState {
    None,
    InProgress,
    Complete,
}

/// Outcome of casting the containment ray at one polygon edge.
enum RayHit {
    Miss,
    OnBoundary,
    Crossing,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn colour(&self) -> u32 {
        self.colour
    }

    pub fn set_colour(&mut self, colour: u32) {
        self.colour = colour;
    }

    #[inline]
    pub const fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[inline]
    pub fn num_sides(&self) -> usize {
        self.sides.len()
    }

    /// Vertex index of side `n`. Panics if `n` is out of range.
    #[inline]
    pub fn side(&self, n: usize) -> usize {
        self.sides[n]
    }

    #[inline]
    pub fn sides(&self) -> &[usize] {
        &self.sides
    }

    /// Append a side referencing arena vertex `v`.
    pub fn add_side(&mut self, v: usize) -> Result<(), GeometryError> {
        if self.sides.len() >= MAX_SIDES {
            return Err(GeometryError::TooManySides);
        }
        self.sides.push(v);
        self.normal = OnceLock::new();
        self.bbox = OnceLock::new();
        Ok(())
    }

    /// Remove every side.
    pub fn clear_sides(&mut self) {
        self.sides.clear();
        self.normal = OnceLock::new();
        self.bbox = OnceLock::new();
    }

    /// Reverse the winding order, invalidating the caches.
    pub fn reverse_sides(&mut self) {
        self.sides.reverse();
        self.normal = OnceLock::new();
        self.bbox = OnceLock::new();
    }

    /// Unit normal of the polygon, computed from its first three vertices
    /// and cached. `None` for points, lines, and collinear leading
    /// vertices. Normalization fails only on an exactly zero cross product,
    /// so collinearity propagates instead of being masked by tolerance.
    pub fn normal(&self, arena: &VertexArray) -> Option<Vector3<Real>> {
        *self.normal.get_or_init(|| {
            if self.sides.len() < 3 {
                return None;
            }
            let v0 = arena.coords(self.sides[0]);
            let v1 = arena.coords(self.sides[1]);
            let v2 = arena.coords(self.sides[2]);
            let side_one = v1 - v0;
            let side_two = v2 - v1;
            side_one.cross(&side_two).try_normalize(0.0)
        })
    }

    /// Make the polygon face in the direction of `wanted` by reversing its
    /// winding if necessary. Returns whether the winding was reversed.
    pub fn set_normal(&mut self, arena: &VertexArray, wanted: &Vector3<Real>) -> bool {
        match self.normal(arena) {
            Some(normal) if !vectors_equal(wanted, &normal) => {
                self.reverse_sides();
                debug_assert!(self
                    .normal(arena)
                    .is_some_and(|normal| vectors_equal(wanted, &normal)));
                true
            }
            _ => false,
        }
    }

    /// Smallest box containing every side vertex, cached. `None` for an
    /// empty polygon.
    pub fn bounding_box(&self, arena: &VertexArray) -> Option<Aabb> {
        *self.bbox.get_or_init(|| {
            let (&first, rest) = self.sides.split_first()?;
            let mut bbox = Aabb::from_point(*arena.coords(first));
            for &v in rest {
                bbox.grow(arena.coords(v));
            }
            Some(bbox)
        })
    }

    /// The projection basis for clipping this polygon, from its normal.
    pub fn find_plane(&self, arena: &VertexArray) -> Option<Plane> {
        self.normal(arena).map(|normal| Plane::from_normal(&normal))
    }

    /// Whether `self` and `other` lie in the same plane.
    ///
    /// Two polygons facing opposite directions are treated as not coplanar:
    /// they are back-to-back decals rather than a Z-fight, and must both
    /// survive clipping.
    pub fn coplanar(&self, other: &Polygon, arena: &VertexArray) -> bool {
        let (p, q, normal, check_every_vertex) =
            match (self.normal(arena), other.normal(arena)) {
                (None, None) => return false,
                (Some(np), Some(nq)) => {
                    // Polygons cannot be coplanar with different normals,
                    // and matching normals mean one vertex check suffices.
                    if !vectors_equal(&np, &nq) {
                        return false;
                    }
                    (self, other, np, false)
                }
                // Only one primitive has a normal (the other is a point or
                // line): every vertex of the degenerate one must lie in the
                // plane of the other.
                (Some(np), None) => (self, other, np, true),
                (None, Some(nq)) => (other, self, nq, true),
            };

        let nsides_q = if check_every_vertex { q.num_sides() } else { 1 };
        let vp = arena.coords(p.side(0));
        for s in 0..nsides_q {
            let vq = arena.coords(q.side(s));
            // The projection of a vertex-to-vertex vector onto the normal
            // is the distance from the vertex to the plane.
            let dist = normal.dot(&(vp - vq)).abs();
            if !coord_equal(dist, 0.0) {
                return false;
            }
        }
        true
    }

    /// Jordan ray cast from arena vertex `v` towards +x in the projection.
    ///
    /// The inexact comparisons deliberately bias nearby points *inside* the
    /// polygon, because this test decides which half of a split polygon to
    /// keep or delete.
    fn contains_point(&self, arena: &VertexArray, v: usize, plane: Plane) -> bool {
        let nsides = self.sides.len();
        if nsides < 3 {
            return false;
        }

        let last_side = self.sides[nsides - 1];
        if last_side == v {
            return true;
        }

        let point = arena.coords(v);
        let px = plane.x_of(point);
        let py = plane.y_of(point);

        // Outside the bounding box (even allowing for error) means outside
        // the polygon.
        let Some(bbox) = self.bounding_box(arena) else {
            return false;
        };
        if !bbox.contains_point_xy(point, plane) {
            return false;
        }
        let top_y = bbox.maxs[plane.y];

        let end = arena.coords(last_side);
        let mut end_x = plane.x_of(end);
        let mut end_y = plane.y_of(end);
        let mut inside = false;

        for s in 0..nsides {
            let v2 = self.sides[s];
            if v2 == v {
                return true;
            }
            let start = arena.coords(v2);
            let start_x = plane.x_of(start);
            let start_y = plane.y_of(start);

            match cast_ray_at_edge(px, py, start_x, start_y, end_x, end_y, top_y) {
                RayHit::OnBoundary => return true,
                RayHit::Crossing => inside = !inside,
                RayHit::Miss => {}
            }

            end_x = start_x;
            end_y = start_y;
        }

        inside
    }

    /// Whether `self` contains every side vertex of `p` in the projection.
    /// Short-circuits on the first vertex outside.
    pub fn contains(&self, p: &Polygon, arena: &VertexArray, plane: Plane) -> bool {
        let (Some(qb), Some(pb)) = (self.bounding_box(arena), p.bounding_box(arena)) else {
            return false;
        };
        if !qb.covers_xy(&pb, plane) {
            return false;
        }

        p.sides
            .iter()
            .all(|&side| self.contains_point(arena, side, plane))
    }

    /// Whether the two polygons are the same cycle of vertex indices, up to
    /// rotation of the starting side. Winding matters: a reversed polygon
    /// is not equal. Polygons with no sides compare equal.
    pub fn same_cycle(&self, p: &Polygon) -> bool {
        let nsides = self.sides.len();
        if nsides != p.sides.len() {
            return false;
        }
        if nsides == 0 {
            return true;
        }

        let Some(offset) = self.sides.iter().position(|&s| s == p.sides[0]) else {
            return false;
        };

        let mut s = offset;
        for t in 1..nsides {
            s = (s + 1) % nsides;
            if self.sides[s] != p.sides[t] {
                return false;
            }
        }
        true
    }

    /// Whether the edge from arena vertex `a` to `b` crosses any edge of
    /// this polygon.
    ///
    /// Edges sharing a vertex index with AB are skipped. Intersections at
    /// A's or B's own coordinates do not count, so contiguous polygons are
    /// not treated as overlapping; the polygon's own corners do count,
    /// because a back polygon is commonly split by a line through one of
    /// its corners.
    pub fn intersects_edge(
        &self,
        a: usize,
        b: usize,
        arena: &VertexArray,
        plane: Plane,
    ) -> bool {
        let nsides = self.sides.len();
        if nsides < 3 {
            return false;
        }

        let mut last_side = self.sides[nsides - 1];
        for s in 0..nsides {
            let side = self.sides[s];
            let shares_vertex = a == last_side || b == last_side || a == side || b == side;
            if !shares_vertex {
                if let Some(hit) = arena.edges_intersect(a, b, last_side, side, plane) {
                    if !points_equal(&hit, arena.coords(a)) && !points_equal(&hit, arena.coords(b))
                    {
                        return true;
                    }
                }
            }
            last_side = side;
        }
        false
    }

    /// Split the polygon along the infinite line through arena vertices `a`
    /// and `b`. Returns the piece that was cut off (to be inserted after
    /// this polygon in its group), or `None` if the line misses.
    ///
    /// Intersection points are deduplicated through the arena, and against
    /// the current edge's endpoints, so the split never creates zero-length
    /// edges. The cut-off piece inherits this polygon's colour, id and
    /// cached normal. On error nothing is mutated except the arena, which
    /// may have grown.
    pub fn split(
        &mut self,
        a: usize,
        b: usize,
        arena: &mut VertexArray,
        plane: Plane,
    ) -> Result<Option<Polygon>, GeometryError> {
        let num_sides = self.sides.len();
        if num_sides < 3 {
            return Ok(None);
        }

        let mut kept = Polygon::new();
        let mut other = Polygon::new();
        let mut state = SplitState::None;
        let mut last_side = self.sides[num_sides - 1];

        for s in 0..num_sides {
            let side = self.sides[s];

            if !matches!(state, SplitState::Complete) {
                if let Some(hit) = arena.edge_intersects_line(last_side, side, a, b, plane) {
                    let v = match arena.find(&hit) {
                        Some(v) => v,
                        None => arena.add(hit),
                    };

                    if matches!(state, SplitState::InProgress) {
                        state = SplitState::Complete;

                        // Close the new polygon at the intersection, and
                        // restart this one there, skipping either when it
                        // coincides with the edge's own endpoints.
                        if v != last_side {
                            other.add_side(v)?;
                        }
                        if v != side {
                            kept.add_side(v)?;
                        }
                    } else {
                        state = SplitState::InProgress;

                        if v != last_side {
                            kept.add_side(v)?;
                        }
                        if v != side {
                            other.add_side(v)?;
                        }
                    }
                }
            }

            // Between the two crossings, vertices move to the new polygon.
            if matches!(state, SplitState::InProgress) {
                other.add_side(side)?;
            } else {
                kept.add_side(side)?;
            }
            last_side = side;
        }

        if !matches!(state, SplitState::Complete) {
            return Ok(None);
        }

        debug_assert!(kept.num_sides() > 2);
        debug_assert!(other.num_sides() > 2);

        let normal = self.normal.get().copied().flatten();
        self.sides = kept.sides;
        self.normal = OnceLock::new();
        self.bbox = OnceLock::new();

        other.colour = self.colour;
        other.id = self.id;
        if let Some(normal) = normal {
            // Both halves lie in the original's plane; carrying the cached
            // normal over also covers halves whose leading vertices are
            // collinear.
            let _ = self.normal.set(Some(normal));
            let _ = other.normal.set(Some(normal));
        }

        Ok(Some(other))
    }

    /// Clip this (back) polygon against one `clipper` (front) polygon.
    ///
    /// Each edge of the clipper is considered as a potential subdividing
    /// line; the walk stops after the first successful split so the caller
    /// can re-evaluate which pieces are occluded. Returns the cut-off
    /// piece, or `None` when nothing was split.
    pub fn clip(
        &mut self,
        clipper: &Polygon,
        arena: &mut VertexArray,
        plane: Plane,
    ) -> Result<Option<Polygon>, GeometryError> {
        let (Some(clipper_bbox), Some(bbox)) =
            (clipper.bounding_box(arena), self.bounding_box(arena))
        else {
            return Err(GeometryError::IncompletePrimitive);
        };

        // If the boxes don't overlap then the polygons don't either.
        if !clipper_bbox.overlaps_xy(&bbox, plane) {
            return Ok(None);
        }

        let num_sides = clipper.num_sides();
        if num_sides < 3 {
            return Err(GeometryError::DegenerateClipper);
        }

        let mut last_side = clipper.side(num_sides - 1);
        let mut last_inside = self.contains_point(arena, last_side, plane);

        for t in 0..num_sides {
            let side = clipper.side(t);
            let this_inside = self.contains_point(arena, side, plane);

            if (last_inside && this_inside)
                || self.intersects_edge(last_side, side, arena, plane)
            {
                // This polygon contains or is crossed by the clipper's
                // edge: split along the edge's infinite line.
                if let Some(other) = self.split(last_side, side, arena, plane)? {
                    return Ok(Some(other));
                }
            }
            last_side = side;
            last_inside = this_inside;
        }

        Ok(None)
    }

    /// Mark every vertex referenced by this polygon as used.
    pub fn mark_used(&self, arena: &mut VertexArray) {
        for &v in &self.sides {
            arena.mark(v);
        }
    }

    /// For polygons of 4 or more sides, the index of the first side whose
    /// vertex leaves the plane of the first three vertices, or `None` for a
    /// planar polygon.
    pub fn skew_side(&self, arena: &VertexArray) -> Option<usize> {
        let nsides = self.sides.len();
        if nsides < 4 {
            return None;
        }
        let normal = self.normal(arena)?;
        let v0 = arena.coords(self.sides[0]);

        for s in 3..nsides {
            // The scalar triple product measures the volume spanned by the
            // leading sides and this vertex; non-zero means skew.
            let volume = normal.dot(&(arena.coords(self.sides[s]) - v0)).abs();
            if !coord_equal(volume, 0.0) {
                return Some(s);
            }
        }
        None
    }

    /// Vertex listing for diagnostics.
    pub fn describe(&self, arena: &VertexArray) -> String {
        let mut text = String::new();
        for (s, &v) in self.sides.iter().enumerate() {
            if s > 0 {
                text.push_str(",\n");
            }
            let pos = arena.coords(v);
            let _ = write!(text, "{}:{{{},{},{}}}", v, pos.x, pos.y, pos.z);
        }
        text
    }
}

/// Classify one closed edge of a polygon against a +x ray from `(px, py)`.
///
/// Horizontal edges never count as crossings; an edge's upper endpoint only
/// counts when it is the polygon's topmost y, so a ray through a shared
/// corner is not recorded twice.
fn cast_ray_at_edge(
    px: Real,
    py: Real,
    start_x: Real,
    start_y: Real,
    end_x: Real,
    end_y: Real,
    top_y: Real,
) -> RayHit {
    // Edges left of the point cannot be in the ray's path.
    if coord_less_than(start_x.max(end_x), px) {
        return RayHit::Miss;
    }

    // Horizontal edges are special-cased to avoid division by zero.
    if coord_equal(end_y, start_y) {
        if coord_less_than(px, start_x.min(end_x)) {
            return RayHit::Miss;
        }
        if coord_equal(py, end_y) || coord_equal(py, start_y) {
            return RayHit::OnBoundary;
        }
        return RayHit::Miss;
    }

    // Be exact about the y extent so that ray intersections with the edge's
    // supporting line are actually on the edge.
    let low_y = start_y.min(end_y);
    if py < low_y {
        return RayHit::Miss;
    }
    let high_y = start_y.max(end_y);
    if py > high_y {
        return RayHit::Miss;
    }
    if py == high_y && high_y != top_y {
        return RayHit::Miss;
    }

    let intersect_x = if coord_equal(end_x, start_x) {
        start_x
    } else {
        // x = s + (y - t)/m for edge endpoint (s, t) and gradient m.
        let m = (end_y - start_y) / (end_x - start_x);
        start_x + (py - start_y) / m
    };

    // An inexact comparison here allows more leeway for points near steep
    // edges than shallow ones.
    if coord_equal(px, intersect_x) {
        return RayHit::OnBoundary;
    }
    if coord_less_than(px, intersect_x) {
        return RayHit::Crossing;
    }
    RayHit::Miss
}
