//! Ordered groups of polygons sharing a render-order rank.

use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::VertexArray;

/// An ordered, mutable sequence of polygons. A polygon's identity within
/// the group is its position, which shifts as siblings are inserted or
/// deleted.
#[derive(Clone, Debug, Default)]
pub struct Group {
    polygons: Vec<Polygon>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Forget all polygons, keeping the backing storage.
    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// Ensure capacity for at least `n` polygons in total.
    pub fn reserve(&mut self, n: usize) {
        self.polygons
            .reserve(n.saturating_sub(self.polygons.len()));
    }

    #[inline]
    pub fn get(&self, n: usize) -> Option<&Polygon> {
        self.polygons.get(n)
    }

    #[inline]
    pub fn get_mut(&mut self, n: usize) -> Option<&mut Polygon> {
        self.polygons.get_mut(n)
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub(crate) fn polygons_mut(&mut self) -> &mut [Polygon] {
        &mut self.polygons
    }

    /// Insert `polygon` at position `at` (`0..=len`), shifting successors
    /// towards the back. Panics if `at > len`.
    pub fn insert(&mut self, at: usize, polygon: Polygon) {
        self.polygons.insert(at, polygon);
    }

    /// Append an empty polygon and return a reference for building it up.
    pub fn add(&mut self) -> &mut Polygon {
        self.polygons.push(Polygon::new());
        self.polygons.last_mut().expect("just pushed")
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Remove the polygon at position `n`, shifting successors towards the
    /// front. Panics if `n` is out of range.
    pub fn delete(&mut self, n: usize) {
        self.polygons.remove(n);
    }

    /// Mark every vertex referenced by any polygon in the group as used.
    pub fn mark_used(&self, arena: &mut VertexArray) {
        for polygon in &self.polygons {
            polygon.mark_used(arena);
        }
    }
}
