//! Wavefront OBJ output for clipped models.
//!
//! The serializer consumes the arena and groups after clipping, marking and
//! renumbering have run: only marked vertices are written, and face lines
//! reference the renumbered ids.

use super::IoError;
use crate::mesh::group::Group;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::VertexArray;
use std::io::Write;

/// How face lines reference vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VertexStyle {
    /// Absolute 1-based indices: `1 + vtotal + id`.
    #[default]
    Positive,
    /// Relative indices counting back from the most recent vertex:
    /// `-(vobject - id)`.
    Negative,
}

/// How polygons with more than three sides are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MeshStyle {
    /// Emit polygons as-is.
    #[default]
    NoChange,
    /// Decompose into a fan around the first vertex.
    TriangleFan,
    /// Decompose into a strip alternating between head and tail.
    TriangleStrip,
}

/// Callbacks and styles for [`write_primitives`].
#[derive(Default)]
pub struct ObjOptions<'a> {
    pub vertex_style: VertexStyle,
    pub mesh_style: MeshStyle,
    /// Override for a polygon's colour; defaults to the stored colour.
    pub get_colour: Option<&'a dyn Fn(&Polygon) -> u32>,
    /// Material name for a colour; defaults to `colour_<n>`.
    pub get_material: Option<&'a dyn Fn(u32) -> String>,
}

fn convert_vnum(
    arena: &VertexArray,
    v: usize,
    vtotal: usize,
    vobject: usize,
    style: VertexStyle,
) -> i64 {
    let id = arena.id_of(v) as i64;
    match style {
        VertexStyle::Negative => {
            debug_assert!(id <= vobject as i64);
            -(vobject as i64 - id)
        }
        VertexStyle::Positive => 1 + vtotal as i64 + id,
    }
}

/// Write the vertex block: a `# <n> vertices` header followed by a
/// `v <x> <y> <z>` line for every marked vertex, in arena order.
///
/// `vobject` is the surviving-vertex count returned by
/// [`VertexArray::renumber`]. If `rot` is set, a
/// `# Following vertices rotate` banner precedes that arena index.
pub fn write_vertices<W: Write>(
    out: &mut W,
    vobject: usize,
    arena: &VertexArray,
    rot: Option<usize>,
) -> Result<(), IoError> {
    writeln!(out, "\n# {vobject} vertices")?;

    for v in 0..arena.len() {
        if rot == Some(v) {
            writeln!(out, "# Following vertices rotate")?;
        }

        if !arena.is_used(v) {
            continue;
        }

        let pos = arena.coords(v);
        write!(out, "v")?;
        for dim in 0..3 {
            write!(out, " {:.6}", pos[dim])?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write every non-empty group as a `g` block of face lines.
///
/// `vtotal` is the number of vertices written for previous objects and
/// `vobject` the number written for this one. A `usemtl` line is emitted
/// whenever the colour changes from one primitive to the next.
pub fn write_primitives<W: Write>(
    out: &mut W,
    object_name: &str,
    vtotal: usize,
    vobject: usize,
    arena: &VertexArray,
    groups: &[Group],
    options: &ObjOptions<'_>,
) -> Result<(), IoError> {
    let mut last_colour: Option<u32> = None;

    for (g, group) in groups.iter().enumerate() {
        if !group.is_empty() {
            writeln!(out, "\n# {} primitives", group.len())?;
            writeln!(out, "g {object_name} {object_name}_{g}")?;
        }

        for polygon in group.polygons() {
            let colour = match options.get_colour {
                Some(get_colour) => get_colour(polygon),
                None => polygon.colour(),
            };
            if last_colour != Some(colour) {
                let material = match options.get_material {
                    Some(get_material) => get_material(colour),
                    None => format!("colour_{colour}"),
                };
                writeln!(out, "usemtl {material}")?;
                last_colour = Some(colour);
            }

            write_primitive(out, polygon, vtotal, vobject, arena, options)?;
        }
    }

    Ok(())
}

fn write_primitive<W: Write>(
    out: &mut W,
    polygon: &Polygon,
    vtotal: usize,
    vobject: usize,
    arena: &VertexArray,
    options: &ObjOptions<'_>,
) -> Result<(), IoError> {
    let nsides = polygon.num_sides();
    let vstyle = options.vertex_style;

    if nsides > 3 && options.mesh_style != MeshStyle::NoChange {
        let mut v = [0i64; 3];
        for s in 0..2 {
            v[s] = convert_vnum(arena, polygon.side(s), vtotal, vobject, vstyle);
        }

        for s in 2..nsides {
            let sindex = match options.mesh_style {
                MeshStyle::TriangleFan => s,
                // Odd iterations count down from the tail, even ones count
                // up from the head.
                MeshStyle::TriangleStrip if s % 2 == 1 => nsides - (s - 1) / 2,
                MeshStyle::TriangleStrip => 1 + s / 2,
                MeshStyle::NoChange => unreachable!(),
            };

            // Replace the first or third vertex (always the third when
            // making triangle fans).
            let vnext = convert_vnum(arena, polygon.side(sindex), vtotal, vobject, vstyle);
            if options.mesh_style == MeshStyle::TriangleFan || s % 2 == 0 {
                v[2] = vnext;
            } else {
                v[0] = vnext;
            }

            write!(out, "f")?;
            for vnum in v {
                write!(out, " {vnum}")?;
            }
            writeln!(out)?;

            // Keep the first or third vertex for the next iteration.
            v[1] = if options.mesh_style == MeshStyle::TriangleFan || s % 2 == 1 {
                v[2]
            } else {
                v[0]
            };
        }
    } else {
        let kind = match nsides {
            1 => "p",
            2 => "l",
            _ => "f",
        };
        write!(out, "{kind}")?;
        for s in 0..nsides {
            let vnum = convert_vnum(arena, polygon.side(s), vtotal, vobject, vstyle);
            write!(out, " {vnum}")?;
        }
        writeln!(out)?;
    }

    Ok(())
}
