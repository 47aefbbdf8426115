use objclip::io::obj::{MeshStyle, ObjOptions, VertexStyle, write_primitives, write_vertices};
use objclip::{Group, VertexArray};

mod support;

use crate::support::{add_polygon, add_vertices, polygon_from_indices};

fn written(write: impl FnOnce(&mut Vec<u8>)) -> String {
    let mut out = Vec::new();
    write(&mut out);
    String::from_utf8(out).unwrap()
}

#[test]
fn vertices_are_written_in_arena_order() {
    let mut arena = VertexArray::new();
    add_vertices(
        &mut arena,
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, -2.0]],
    );
    arena.mark_all();
    let kept = arena.renumber().unwrap();

    let text = written(|out| write_vertices(out, kept, &arena, None).unwrap());
    assert_eq!(
        text,
        "\n# 3 vertices\n\
         v 0.000000 0.000000 0.000000\n\
         v 1.000000 0.000000 0.000000\n\
         v 0.500000 1.000000 -2.000000\n"
    );
}

#[test]
fn unused_vertices_are_omitted() {
    let mut arena = VertexArray::new();
    add_vertices(
        &mut arena,
        &[[0.0, 0.0, 0.0], [5.0, 5.0, 5.0], [1.0, 1.0, 1.0]],
    );
    arena.mark(0);
    arena.mark(2);
    let kept = arena.renumber().unwrap();
    assert_eq!(kept, 2);

    let text = written(|out| write_vertices(out, kept, &arena, None).unwrap());
    assert!(text.starts_with("\n# 2 vertices\n"));
    assert!(!text.contains("v 5.000000"));
    assert!(text.contains("v 1.000000 1.000000 1.000000\n"));
}

#[test]
fn rotation_banner_precedes_the_pivot() {
    let mut arena = VertexArray::new();
    add_vertices(&mut arena, &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
    arena.mark_all();
    let kept = arena.renumber().unwrap();

    let text = written(|out| write_vertices(out, kept, &arena, Some(1)).unwrap());
    let banner = text.find("# Following vertices rotate\n").unwrap();
    let pivot = text.find("v 1.000000").unwrap();
    assert!(banner < pivot);
}

#[test]
fn faces_use_absolute_indices_in_positive_style() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let text = written(|out| {
        write_primitives(
            out,
            "model",
            0,
            vobject,
            &arena,
            &groups,
            &ObjOptions::default(),
        )
        .unwrap()
    });

    assert!(text.contains("\n# 1 primitives\n"));
    assert!(text.contains("g model model_0\n"));
    assert!(text.contains("usemtl colour_0\n"));
    assert!(text.contains("f 1 2 3 4\n"));
}

#[test]
fn negative_style_counts_back_from_the_latest_vertex() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let options = ObjOptions {
        vertex_style: VertexStyle::Negative,
        ..ObjOptions::default()
    };
    let text = written(|out| {
        write_primitives(out, "model", 0, vobject, &arena, &groups, &options).unwrap()
    });

    assert!(text.contains("f -4 -3 -2 -1\n"));
}

#[test]
fn vtotal_offsets_absolute_indices_across_objects() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    // 10 vertices were already written for earlier objects.
    let text = written(|out| {
        write_primitives(
            out,
            "model",
            10,
            vobject,
            &arena,
            &groups,
            &ObjOptions::default(),
        )
        .unwrap()
    });

    assert!(text.contains("f 11 12 13\n"));
}

#[test]
fn points_and_lines_use_their_own_prefixes() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];

    let point = add_vertices(&mut arena, &[[0.0, 0.0, 0.0]]);
    groups[0].push(polygon_from_indices(&point));
    let line = add_vertices(&mut arena, &[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
    groups[0].push(polygon_from_indices(&line));

    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let text = written(|out| {
        write_primitives(
            out,
            "model",
            0,
            vobject,
            &arena,
            &groups,
            &ObjOptions::default(),
        )
        .unwrap()
    });

    assert!(text.contains("p 1\n"));
    assert!(text.contains("l 2 3\n"));
}

#[test]
fn triangle_fan_decomposition() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
            [1.5, 2.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let options = ObjOptions {
        mesh_style: MeshStyle::TriangleFan,
        ..ObjOptions::default()
    };
    let text = written(|out| {
        write_primitives(out, "model", 0, vobject, &arena, &groups, &options).unwrap()
    });

    let faces: Vec<&str> = text.lines().filter(|l| l.starts_with('f')).collect();
    assert_eq!(faces, ["f 1 2 3", "f 1 3 4", "f 1 4 5"]);
}

#[test]
fn triangle_strip_decomposition() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 1.0, 0.0],
            [2.0, 2.0, 0.0],
            [0.0, 2.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let options = ObjOptions {
        mesh_style: MeshStyle::TriangleStrip,
        ..ObjOptions::default()
    };
    let text = written(|out| {
        write_primitives(out, "model", 0, vobject, &arena, &groups, &options).unwrap()
    });

    // Strip order alternates between advancing from the head and the tail.
    let faces: Vec<&str> = text.lines().filter(|l| l.starts_with('f')).collect();
    assert_eq!(faces, ["f 1 2 3", "f 6 1 3", "f 6 3 4", "f 5 6 4"]);
}

#[test]
fn triangles_are_never_decomposed() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    );
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let options = ObjOptions {
        mesh_style: MeshStyle::TriangleFan,
        ..ObjOptions::default()
    };
    let text = written(|out| {
        write_primitives(out, "model", 0, vobject, &arena, &groups, &options).unwrap()
    });

    assert!(text.contains("f 1 2 3\n"));
}

#[test]
fn usemtl_is_emitted_only_on_colour_changes() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    for colour in [3, 3, 5] {
        let v = add_vertices(
            &mut arena,
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        let polygon = groups[0].add();
        for &i in &v {
            polygon.add_side(i).unwrap();
        }
        polygon.set_colour(colour);
    }
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let text = written(|out| {
        write_primitives(
            out,
            "model",
            0,
            vobject,
            &arena,
            &groups,
            &ObjOptions::default(),
        )
        .unwrap()
    });

    let materials: Vec<&str> = text.lines().filter(|l| l.starts_with("usemtl")).collect();
    assert_eq!(materials, ["usemtl colour_3", "usemtl colour_5"]);
}

#[test]
fn material_names_come_from_the_callback() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];
    add_polygon(
        &mut arena,
        &mut groups[0],
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    );
    groups[0].get_mut(0).unwrap().set_colour(9);
    groups[0].mark_used(&mut arena);
    let vobject = arena.renumber().unwrap();

    let get_material = |colour: u32| format!("paint_{colour:02}");
    let options = ObjOptions {
        get_material: Some(&get_material),
        ..ObjOptions::default()
    };
    let text = written(|out| {
        write_primitives(out, "model", 0, vobject, &arena, &groups, &options).unwrap()
    });

    assert!(text.contains("usemtl paint_09\n"));
}

#[test]
fn empty_groups_write_nothing() {
    let arena = VertexArray::new();
    let groups = vec![Group::new(), Group::new()];

    let text = written(|out| {
        write_primitives(out, "model", 0, 1, &arena, &groups, &ObjOptions::default()).unwrap()
    });
    assert!(text.is_empty());
}

#[test]
fn duplicates_resolve_to_the_representative_id() {
    let mut arena = VertexArray::new();
    let mut groups = vec![Group::new()];

    // A triangle whose last vertex duplicates an earlier one's coordinates.
    let a = arena.add(nalgebra::Point3::new(0.0, 0.0, 0.0));
    let b = arena.add(nalgebra::Point3::new(1.0, 0.0, 0.0));
    let c = arena.add(nalgebra::Point3::new(0.0, 1.0, 0.0));
    let dup_of_c = arena.add(nalgebra::Point3::new(0.0001, 1.0, 0.0));
    groups[0].push(polygon_from_indices(&[a, b, dup_of_c]));

    groups[0].mark_used(&mut arena);
    assert_eq!(arena.find_duplicates(), 1);
    let vobject = arena.renumber().unwrap();
    assert_eq!(vobject, 3);

    let text = written(|out| {
        write_primitives(
            out,
            "model",
            0,
            vobject,
            &arena,
            &groups,
            &ObjOptions::default(),
        )
        .unwrap()
    });

    // The face references c's id, not the duplicate's stale one.
    assert_eq!(arena.id_of(dup_of_c), arena.id_of(c));
    assert!(text.contains("f 1 2 3\n"));
}
