//! Integration tests for regolith-mesh.

use std::collections::BTreeSet;

use regolith_math::Vec3;
use regolith_mesh::generators::{icosahedron, panel, unit_cube};
use regolith_mesh::{build_clusters, ContactMesh};
use regolith_types::RegolithError;

// ─── Mesh Validation Tests ────────────────────────────────────

#[test]
fn from_arrays_builds_single_group() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = ContactMesh::from_arrays(&positions, &[0, 1, 2]).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn non_triangular_group_is_rejected() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
    let result = ContactMesh::from_arrays(&positions, &[0, 1, 2, 3]);
    assert!(matches!(result, Err(RegolithError::InvalidMesh(_))));
}

#[test]
fn out_of_range_index_is_rejected() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let result = ContactMesh::from_arrays(&positions, &[0, 1, 9]);
    assert!(matches!(result, Err(RegolithError::InvalidMesh(_))));
}

// ─── Cluster Builder Tests ────────────────────────────────────

#[test]
fn cube_forms_single_cluster_under_generous_cap() {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].faces.len(), 12);

    // A closed cube has 18 unique edges, all interior.
    assert_eq!(clusters[0].edges.len(), 18);
    assert!(clusters[0].edges.iter().all(|e| e.twin.is_some()));

    // The sole cluster owns all 8 vertices.
    assert_eq!(clusters[0].unique_verts.len(), 8);

    // Box encloses the cube on every axis.
    for k in 0..3 {
        assert!(clusters[0].half_extents[k] >= 0.5 - 1e-12);
    }
    assert!(clusters[0].centroid.length() < 1e-9);
}

#[test]
fn every_triangle_lands_in_exactly_one_cluster() {
    let mesh = icosahedron(1.0);
    let clusters = build_clusters(&mesh, 0.6, 0.005).unwrap();

    let total: usize = clusters.iter().map(|c| c.faces.len()).sum();
    assert_eq!(total, 20);

    // Spatial coherence cap forces the icosahedron apart.
    assert!(
        clusters.len() >= 2,
        "expected >= 2 clusters, got {}",
        clusters.len()
    );
}

#[test]
fn icosahedron_interior_edges_appear_once_with_twin() {
    let mesh = icosahedron(1.0);
    let clusters = build_clusters(&mesh, 0.6, 0.005).unwrap();

    // A closed icosahedron has 30 edges; each must be stored exactly once
    // and carry both adjacent faces.
    let total_edges: usize = clusters.iter().map(|c| c.edges.len()).sum();
    assert_eq!(total_edges, 30);
    for cluster in &clusters {
        for edge in &cluster.edges {
            assert!(edge.twin.is_some(), "closed surface has no boundary edges");
        }
    }

    // No edge (as an unordered vertex pair) appears twice.
    let mut seen = BTreeSet::new();
    for cluster in &clusters {
        for edge in &cluster.edges {
            let key = (edge.verts[0].min(edge.verts[1]), edge.verts[0].max(edge.verts[1]));
            assert!(seen.insert(key), "edge {:?} stored twice", key);
        }
    }
}

#[test]
fn panel_boundary_edges_have_no_twin() {
    let mesh = panel(1.0);
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();

    assert_eq!(clusters.len(), 1);
    let cluster = &clusters[0];
    // 2 triangles: 5 unique edges, 1 interior (the diagonal).
    assert_eq!(cluster.edges.len(), 5);
    let interior = cluster.edges.iter().filter(|e| e.twin.is_some()).count();
    assert_eq!(interior, 1);
}

#[test]
fn panel_box_height_hits_configured_floor() {
    let mesh = panel(2.0);
    let clusters = build_clusters(&mesh, 100.0, 0.005).unwrap();

    let he = clusters[0].half_extents;
    assert!((he.x - 2.0).abs() < 1e-12);
    assert!((he.y - 2.0).abs() < 1e-12);
    // A flat panel has zero height; the floor keeps swept tests nonzero-width.
    assert_eq!(he.z, 0.005);
}

#[test]
fn unique_vertices_partition_the_body() {
    let mesh = icosahedron(1.0);
    let clusters = build_clusters(&mesh, 0.6, 0.005).unwrap();

    let mut all: Vec<u32> = Vec::new();
    for cluster in &clusters {
        all.extend(&cluster.unique_verts);
    }
    let unique: BTreeSet<u32> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len(), "unique vertex sets must be disjoint");
    assert_eq!(unique.len(), 12, "every vertex must be owned by some cluster");
}

#[test]
fn degenerate_triangles_are_skipped() {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
    ];
    // Second triangle is collinear (zero area).
    let indices = vec![0, 1, 2, 0, 1, 3];
    let mesh = ContactMesh::from_arrays(
        &vertices
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect::<Vec<_>>(),
        &indices,
    )
    .unwrap();

    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();
    let total: usize = clusters.iter().map(|c| c.faces.len()).sum();
    assert_eq!(total, 1);
}

#[test]
fn face_normals_point_outward() {
    let mesh = unit_cube();
    let clusters = build_clusters(&mesh, 10.0, 0.005).unwrap();
    for face in &clusters[0].faces {
        // Outward normal must point away from the cube center.
        assert!(
            face.normal.dot(face.centroid) > 0.0,
            "face normal {:?} points inward at {:?}",
            face.normal,
            face.centroid
        );
    }
}

#[test]
fn cluster_growth_respects_dimension_cap() {
    let mesh = icosahedron(1.0);
    let max_dim = 0.6;
    let clusters = build_clusters(&mesh, max_dim, 0.005).unwrap();

    for cluster in &clusters {
        if cluster.faces.len() <= 1 {
            continue; // a single oversized triangle is allowed
        }
        let mut verts: Vec<Vec3> = Vec::new();
        for face in &cluster.faces {
            for &v in &face.verts {
                verts.push(mesh.vertices[v as usize]);
            }
        }
        for a in &verts {
            for b in &verts {
                assert!(
                    (*a - *b).length() < max_dim,
                    "cluster exceeds max dimension: {}",
                    (*a - *b).length()
                );
            }
        }
    }
}
