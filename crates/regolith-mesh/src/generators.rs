//! Procedural mesh generators for scenarios and testing.
//!
//! All generators produce closed (or intentionally open, for `panel`)
//! surfaces with outward CCW winding, in body frame, centered at the origin.

use regolith_math::Vec3;

use crate::mesh::{ContactMesh, ShapeGroup};

fn single_group(name: &str, vertices: Vec<Vec3>, indices: Vec<u32>) -> ContactMesh {
    ContactMesh::new(
        vertices,
        vec![ShapeGroup {
            name: name.to_string(),
            indices,
        }],
    )
}

/// Generates an axis-aligned box with the given half-extents.
///
/// 8 vertices, 12 triangles, outward CCW winding.
pub fn cuboid(half_extents: Vec3) -> ContactMesh {
    let h = half_extents;
    let vertices = vec![
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 3, 2,  0, 2, 1, // -z
        4, 5, 6,  4, 6, 7, // +z
        0, 1, 5,  0, 5, 4, // -y
        2, 3, 7,  2, 7, 6, // +y
        0, 4, 7,  0, 7, 3, // -x
        1, 2, 6,  1, 6, 5, // +x
    ];
    single_group("cuboid", vertices, indices)
}

/// Generates a unit cube (edge length 1).
pub fn unit_cube() -> ContactMesh {
    cuboid(Vec3::splat(0.5))
}

/// Generates a flat square panel in the XY plane, normals facing +Z.
///
/// Open surface: 4 vertices, 2 triangles. Used as ground/target geometry
/// for kinematic bodies.
pub fn panel(half_size: f64) -> ContactMesh {
    let s = half_size;
    let vertices = vec![
        Vec3::new(-s, -s, 0.0),
        Vec3::new(s, -s, 0.0),
        Vec3::new(s, s, 0.0),
        Vec3::new(-s, s, 0.0),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    single_group("panel", vertices, indices)
}

/// Generates a regular icosahedron with the given edge length.
///
/// 12 vertices, 20 triangles, outward CCW winding.
pub fn icosahedron(edge_length: f64) -> ContactMesh {
    let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
    // The canonical construction spans edge length 2; rescale.
    let s = edge_length / 2.0;

    let vertices = vec![
        Vec3::new(-1.0, phi, 0.0) * s,
        Vec3::new(1.0, phi, 0.0) * s,
        Vec3::new(-1.0, -phi, 0.0) * s,
        Vec3::new(1.0, -phi, 0.0) * s,
        Vec3::new(0.0, -1.0, phi) * s,
        Vec3::new(0.0, 1.0, phi) * s,
        Vec3::new(0.0, -1.0, -phi) * s,
        Vec3::new(0.0, 1.0, -phi) * s,
        Vec3::new(phi, 0.0, -1.0) * s,
        Vec3::new(phi, 0.0, 1.0) * s,
        Vec3::new(-phi, 0.0, -1.0) * s,
        Vec3::new(-phi, 0.0, 1.0) * s,
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
        1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
        3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
        4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
    ];
    single_group("icosahedron", vertices, indices)
}
