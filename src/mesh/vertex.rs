//! Vertex storage: an append-only arena with deduplication, usage marking
//! and output renumbering, plus the edge-intersection predicates that work
//! on arena indices.

use crate::errors::GeometryError;
use crate::float_types::{Real, coord_less_than};
use crate::mesh::plane::{Plane, points_equal};
use nalgebra::Point3;
use std::cmp::Ordering;

/// A single vertex. `id` is the output number (equal to the arena index
/// until [`VertexArray::renumber`] runs), `dup` links a duplicate to an
/// earlier representative, and `marked` records that some surviving polygon
/// references the vertex.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: Point3<Real>,
    id: usize,
    dup: Option<usize>,
    marked: bool,
}

impl Vertex {
    #[inline]
    pub const fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub const fn duplicate_of(&self) -> Option<usize> {
        self.dup
    }

    #[inline]
    pub const fn is_marked(&self) -> bool {
        self.marked
    }
}

/// Append-only vertex arena. Vertices are never removed; dropping a vertex
/// from the output is expressed by the absence of its `marked` flag.
#[derive(Clone, Debug, Default)]
pub struct VertexArray {
    vertices: Vec<Vertex>,
    /// Scratch index view reused by duplicate detection.
    sorted: Vec<usize>,
    deduped: bool,
    marked_since_dedup: bool,
}

impl VertexArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Forget all vertices, keeping the backing storage.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.deduped = false;
        self.marked_since_dedup = false;
    }

    /// Append a vertex unconditionally and return its index.
    pub fn add(&mut self, pos: Point3<Real>) -> usize {
        let v = self.vertices.len();
        self.vertices.push(Vertex {
            pos,
            id: v,
            dup: None,
            marked: false,
        });
        tracing::trace!(index = v, "added vertex {:?}", pos);
        v
    }

    /// Linear scan for a vertex with tolerant-equal coordinates.
    pub fn find(&self, pos: &Point3<Real>) -> Option<usize> {
        self.vertices.iter().position(|v| points_equal(&v.pos, pos))
    }

    #[inline]
    pub fn get(&self, n: usize) -> Option<&Vertex> {
        self.vertices.get(n)
    }

    /// Coordinates of vertex `n`. Panics if `n` is out of range; indices
    /// handed out by this arena are always valid.
    #[inline]
    pub fn coords(&self, n: usize) -> &Point3<Real> {
        &self.vertices[n].pos
    }

    /// Output id of vertex `n`, following the duplicate chain to the
    /// representative.
    pub fn id_of(&self, n: usize) -> usize {
        let mut vertex = &self.vertices[n];
        while let Some(dup) = vertex.dup {
            vertex = &self.vertices[dup];
        }
        vertex.id
    }

    /// Mark vertex `n` as used by a surviving polygon.
    pub fn mark(&mut self, n: usize) {
        self.vertices[n].marked = true;
        self.marked_since_dedup = true;
    }

    pub fn mark_all(&mut self) {
        for vertex in &mut self.vertices {
            vertex.marked = true;
        }
        self.marked_since_dedup = true;
    }

    #[inline]
    pub fn is_used(&self, n: usize) -> bool {
        self.vertices[n].marked
    }

    /// Collapse tolerant-equal vertices into duplicate classes and return
    /// the number of duplicates found.
    ///
    /// The sorted view orders vertices by exact lexicographic coordinates;
    /// tolerant equality then decides which neighbours collapse. The
    /// representative of a class is the earliest vertex by sort position.
    /// Marks are propagated to the representative and cleared on the
    /// duplicate so that the output never contains duplicate coordinates.
    pub fn find_duplicates(&mut self) -> usize {
        let nvertices = self.vertices.len();
        let mut sorted = std::mem::take(&mut self.sorted);
        sorted.clear();
        sorted.extend(0..nvertices);
        {
            let vertices = &self.vertices;
            sorted.sort_by(|&i, &j| {
                let (a, b) = (&vertices[i].pos, &vertices[j].pos);
                for dim in 0..3 {
                    match a[dim].partial_cmp(&b[dim]) {
                        Some(Ordering::Equal) | None => continue,
                        Some(order) => return order,
                    }
                }
                Ordering::Equal
            });
        }

        let mut ndup = 0;
        let mut last = 0;
        for v in 1..nvertices {
            let rep = sorted[last];
            let dup = sorted[v];
            if points_equal(&self.vertices[rep].pos, &self.vertices[dup].pos) {
                ndup += 1;
                tracing::debug!(
                    "vertex {} duplicates {} {:?}",
                    self.vertices[dup].id,
                    self.vertices[rep].id,
                    self.vertices[dup].pos
                );

                // Link the duplicate to the representative so that querying
                // its id returns whatever the representative's id becomes
                // after renumbering.
                self.vertices[dup].dup = Some(rep);

                // The representative must be output if any vertex linked to
                // it is marked; the duplicate itself must not be.
                if self.vertices[dup].marked {
                    self.vertices[rep].marked = true;
                    self.vertices[dup].marked = false;
                }
            } else {
                last = v;
            }
        }

        self.sorted = sorted;
        self.deduped = true;
        self.marked_since_dedup = false;
        tracing::debug!("{ndup}/{nvertices} vertices were duplicates");
        ndup
    }

    /// Assign compact output ids `0..kept` to marked vertices in arena
    /// order and return `kept`. Unmarked vertices keep a stale id; they are
    /// never emitted.
    ///
    /// Fails with [`GeometryError::StaleDuplicates`] if vertices were
    /// marked after the most recent [`VertexArray::find_duplicates`] call,
    /// because those marks were never propagated to the representatives.
    pub fn renumber(&mut self) -> Result<usize, GeometryError> {
        if self.deduped && self.marked_since_dedup {
            return Err(GeometryError::StaleDuplicates);
        }

        let mut next_id = 0;
        for vertex in &mut self.vertices {
            if vertex.marked {
                if next_id != vertex.id {
                    tracing::trace!("renumbering vertex {} as {}", vertex.id, next_id);
                }
                vertex.id = next_id;
                next_id += 1;
            }
        }
        tracing::debug!("{next_id}/{} vertices survived", self.vertices.len());
        Ok(next_id)
    }

    /// Intersect the finite edge AB with the infinite line CD.
    ///
    /// The edge's start is inclusive and its end exclusive, so that walking
    /// a closed polygon never reports the same corner intersection twice.
    pub fn edge_intersects_line(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
        plane: Plane,
    ) -> Option<Point3<Real>> {
        debug_assert_ne!(a, b);
        debug_assert_ne!(c, d);

        let va = self.coords(a);
        let vb = self.coords(b);
        let hit = plane.intersect_lines(va, vb, self.coords(c), self.coords(d))?;

        let ix = plane.x_of(&hit);
        let (ax, bx) = (plane.x_of(va), plane.x_of(vb));
        if coord_less_than(ix, ax.min(bx)) || coord_less_than(ax.max(bx), ix) {
            return None;
        }

        let iy = plane.y_of(&hit);
        let (ay, by) = (plane.y_of(va), plane.y_of(vb));
        if coord_less_than(iy, ay.min(by)) || coord_less_than(ay.max(by), iy) {
            return None;
        }

        if points_equal(&hit, vb) {
            return None;
        }

        Some(hit)
    }

    /// Intersect the finite edges AB and CD, both with inclusive endpoints.
    pub fn edges_intersect(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
        plane: Plane,
    ) -> Option<Point3<Real>> {
        debug_assert_ne!(a, b);
        debug_assert_ne!(c, d);

        let va = self.coords(a);
        let vb = self.coords(b);
        let vc = self.coords(c);
        let vd = self.coords(d);

        let (ax, bx) = (plane.x_of(va), plane.x_of(vb));
        let (cx, dx) = (plane.x_of(vc), plane.x_of(vd));
        let (ab_low_x, ab_high_x) = (ax.min(bx), ax.max(bx));
        let (cd_low_x, cd_high_x) = (cx.min(dx), cx.max(dx));

        // Meant as less/greater-than, but the comparison must be inexact.
        if coord_less_than(cd_high_x, ab_low_x) || coord_less_than(ab_high_x, cd_low_x) {
            return None;
        }

        let (ay, by) = (plane.y_of(va), plane.y_of(vb));
        let (cy, dy) = (plane.y_of(vc), plane.y_of(vd));
        let (ab_low_y, ab_high_y) = (ay.min(by), ay.max(by));
        let (cd_low_y, cd_high_y) = (cy.min(dy), cy.max(dy));

        if coord_less_than(cd_high_y, ab_low_y) || coord_less_than(ab_high_y, cd_low_y) {
            return None;
        }

        let hit = plane.intersect_lines(va, vb, vc, vd)?;

        // The intersection must fall inside the overlap of both extents.
        let ix = plane.x_of(&hit);
        if coord_less_than(ix, ab_low_x.max(cd_low_x))
            || coord_less_than(ab_high_x.min(cd_high_x), ix)
        {
            return None;
        }

        let iy = plane.y_of(&hit);
        if coord_less_than(iy, ab_low_y.max(cd_low_y))
            || coord_less_than(ab_high_y.min(cd_high_y), iy)
        {
            return None;
        }

        Some(hit)
    }
}
