#![forbid(unsafe_code)]

//! Coplanar-polygon clipping for Wavefront OBJ models.
//!
//! Polygonal models converted from paint-order graphics formats often
//! contain coplanar polygons drawn over one another (decals on a wall,
//! markings on a wing). Exported to a Z-buffered format as-is they
//! Z-fight. This crate detects overlapping coplanar polygons, given the
//! original back-to-front render order, and resubdivides the rearward
//! polygon so that no visible overlap remains; polygons that end up fully
//! occluded are deleted.
//!
//! The substrate is a deduplicating [`VertexArray`] and [`Group`]s of
//! [`Polygon`]s referencing vertices by index. [`clip_polygons`] mutates
//! both. The [`io::obj`] module writes the result as an OBJ fragment.
//!
//! # Example
//!
//! ```
//! use objclip::{Group, VertexArray, clip_polygons};
//! use nalgebra::Point3;
//!
//! let mut arena = VertexArray::new();
//! let mut groups = vec![Group::new(), Group::new()];
//!
//! // A unit quad at the origin, and the same quad drawn over it.
//! let corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
//! let indices: Vec<usize> = corners
//!     .iter()
//!     .map(|&[x, y]| arena.add(Point3::new(x, y, 0.0)))
//!     .collect();
//! for g in 0..2 {
//!     let polygon = groups[g].add();
//!     for &v in &indices {
//!         polygon.add_side(v).unwrap();
//!     }
//! }
//!
//! // Group 0 renders first (rearmost), so its quad is fully occluded.
//! clip_polygons(&mut arena, &mut groups, &[0, 1]).unwrap();
//! assert!(groups[0].is_empty());
//! assert_eq!(groups[1].len(), 1);
//! ```

pub mod clip;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use clip::{MAX_SPLITS, clip_polygons};
pub use errors::{ClipError, GeometryError};
pub use mesh::group::Group;
pub use mesh::plane::Plane;
pub use mesh::polygon::{MAX_SIDES, Polygon};
pub use mesh::vertex::{Vertex, VertexArray};
