//! Test support library
//! Provides helper functions shared by the integration tests.
#![allow(dead_code)]

use nalgebra::Point3;
use objclip::float_types::Real;
use objclip::{Group, Polygon, VertexArray};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Add the given coordinates to the arena and return their indices.
pub fn add_vertices(arena: &mut VertexArray, points: &[[Real; 3]]) -> Vec<usize> {
    points
        .iter()
        .map(|p| arena.add(Point3::new(p[0], p[1], p[2])))
        .collect()
}

/// Build a standalone polygon over existing arena vertices.
pub fn polygon_from_indices(indices: &[usize]) -> Polygon {
    let mut polygon = Polygon::new();
    for &v in indices {
        polygon.add_side(v).expect("test polygon within side capacity");
    }
    polygon
}

/// Add the given coordinates to the arena and append a polygon over them to
/// `group`. Returns the new vertex indices.
pub fn add_polygon(arena: &mut VertexArray, group: &mut Group, points: &[[Real; 3]]) -> Vec<usize> {
    let indices = add_vertices(arena, points);
    let polygon = group.add();
    for &v in &indices {
        polygon.add_side(v).expect("test polygon within side capacity");
    }
    indices
}

/// Side lists of every polygon in a group, for before/after comparisons.
pub fn group_sides(group: &Group) -> Vec<Vec<usize>> {
    group
        .polygons()
        .iter()
        .map(|p| p.sides().to_vec())
        .collect()
}
