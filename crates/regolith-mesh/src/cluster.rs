//! Half-edge cluster builder.
//!
//! Compiles a validated [`ContactMesh`] into spatially-coherent face
//! clusters. Built once at body registration:
//!
//! 1. *Per-triangle setup* — outward normal from the CCW vertex order,
//!    centroid, axis-aligned half-extents, distance-from-origin.
//! 2. *Adjacency* — two triangles sharing an edge in opposite orientations
//!    are neighbors (up to three per triangle).
//! 3. *Clustering* — seed with the furthest ungrouped triangle, grow by the
//!    adjacent triangle whose worst-case vertex distance to the cluster is
//!    smallest, stop at `max_bounding_box_dim`. Grows compact, axis-bounded
//!    clusters regardless of mesh traversal order.
//! 4. *Cluster box* — planar footprint from the XY-projected convex hull
//!    (vertex-set fallback when degenerate), height from the vertex set.
//! 5. *Edge pairing* — every directed edge matched with its reverse
//!    anywhere in the body; stored once with the twin's cluster and face.
//!    Unpaired edges are boundary edges.
//! 6. *Unique vertices* — each cluster owns the vertices no earlier cluster
//!    claimed, so vertex-face tests never double-report a shared vertex.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use regolith_math::{convex_hull_xy, Vec3};
use regolith_types::constants::DEGENERATE_AREA_THRESHOLD;
use regolith_types::{ClusterId, FaceId, RegolithError, RegolithResult};

use crate::mesh::ContactMesh;

/// A single triangular face within a cluster.
#[derive(Debug, Clone)]
pub struct Face {
    /// Vertex indices in CCW order (viewed from outside the body).
    pub verts: [u32; 3],
    /// Outward unit normal derived from the CCW order.
    pub normal: Vec3,
    /// Face centroid in body frame.
    pub centroid: Vec3,
    /// Axis-aligned half-extents of the triangle about its centroid.
    pub half_extents: Vec3,
}

/// A unique edge with its one or two adjacent faces.
///
/// Interior edges are stored once; the reverse-oriented duplicate is folded
/// into `twin`. Boundary edges carry only the owning face.
#[derive(Debug, Clone)]
pub struct ClusterEdge {
    /// Vertex indices of the edge, in the owning face's winding order.
    pub verts: [u32; 2],
    /// Owning face within the containing cluster.
    pub face: FaceId,
    /// The adjacent face on the far side, addressed body-wide.
    pub twin: Option<(ClusterId, FaceId)>,
}

/// A spatially-coherent group of faces sharing an oriented bounding box.
///
/// Clusters are the unit of broad-phase culling; their unique vertices and
/// edges are the primitives the narrow phase sweeps.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Member faces.
    pub faces: Vec<Face>,
    /// Unique edges owned by this cluster.
    pub edges: Vec<ClusterEdge>,
    /// Vertex indices owned by this cluster and no earlier one.
    pub unique_verts: Vec<u32>,
    /// Bounding-box centroid in body frame.
    pub centroid: Vec3,
    /// Bounding-box half-extents, at least `min_bounding_box_dim` per axis.
    pub half_extents: Vec3,
}

/// Per-triangle scratch data from step 1.
struct TriSetup {
    verts: [u32; 3],
    normal: Vec3,
    centroid: Vec3,
    half_extents: Vec3,
    max_norm: f64,
}

#[inline]
fn directed_edges(verts: [u32; 3]) -> [(u32, u32); 3] {
    [
        (verts[0], verts[1]),
        (verts[1], verts[2]),
        (verts[2], verts[0]),
    ]
}

/// Builds the cluster list for a body.
///
/// Every non-degenerate triangle lands in exactly one cluster. Degenerate
/// (zero-area) triangles are skipped; non-manifold edges are accepted with
/// best-effort adjacency.
pub fn build_clusters(
    mesh: &ContactMesh,
    max_bounding_box_dim: f64,
    min_bounding_box_dim: f64,
) -> RegolithResult<Vec<Cluster>> {
    mesh.validate()?;

    // ── 1. Per-triangle setup ──
    let mut tris: Vec<TriSetup> = Vec::with_capacity(mesh.triangle_count());
    for [a, b, c] in mesh.triangles() {
        let va = mesh.vertices[a as usize];
        let vb = mesh.vertices[b as usize];
        let vc = mesh.vertices[c as usize];

        let cross = (vb - va).cross(vc - vb);
        if cross.length() < DEGENERATE_AREA_THRESHOLD {
            continue;
        }
        let centroid = (va + vb + vc) / 3.0;
        let mut half_extents = Vec3::ZERO;
        for v in [va, vb, vc] {
            half_extents = half_extents.max((v - centroid).abs());
        }

        tris.push(TriSetup {
            verts: [a, b, c],
            normal: cross.normalize(),
            centroid,
            half_extents,
            max_norm: va.length().max(vb.length()).max(vc.length()),
        });
    }
    if tris.is_empty() {
        return Err(RegolithError::InvalidMesh(
            "Every triangle in the mesh is degenerate".into(),
        ));
    }

    // ── 2. Adjacency ──
    // A manifold CCW surface mentions each directed edge once; the face on
    // the far side of (a, b) is the one holding (b, a).
    let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
    for (t, tri) in tris.iter().enumerate() {
        for edge in directed_edges(tri.verts) {
            directed.insert(edge, t);
        }
    }
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); tris.len()];
    for (t, tri) in tris.iter().enumerate() {
        for (a, b) in directed_edges(tri.verts) {
            if let Some(&other) = directed.get(&(b, a)) {
                if other != t {
                    neighbors[t].push(other);
                }
            }
        }
    }

    // ── 3. Clustering ──
    let mut order: Vec<usize> = (0..tris.len()).collect();
    order.sort_by(|&i, &j| {
        tris[j]
            .max_norm
            .partial_cmp(&tris[i].max_norm)
            .unwrap_or(Ordering::Equal)
    });

    let mut grouped = vec![false; tris.len()];
    let mut memberships: Vec<Vec<usize>> = Vec::new();

    for &seed in &order {
        if grouped[seed] {
            continue;
        }
        grouped[seed] = true;
        let mut members = vec![seed];
        let mut member_verts: Vec<Vec3> = tris[seed]
            .verts
            .iter()
            .map(|&v| mesh.vertices[v as usize])
            .collect();

        loop {
            // Ungrouped faces adjacent to the cluster so far.
            let mut candidates: Vec<usize> = Vec::new();
            for &m in &members {
                for &n in &neighbors[m] {
                    if !grouped[n] && !candidates.contains(&n) {
                        candidates.push(n);
                    }
                }
            }
            if candidates.is_empty() {
                break;
            }

            // Worst-case pairwise vertex distance each candidate would
            // introduce; extend with the least-bad one.
            let worst_dist = |cand: usize| -> f64 {
                let mut worst = 0.0f64;
                for &cv in &tris[cand].verts {
                    let p = mesh.vertices[cv as usize];
                    for &mv in &member_verts {
                        worst = worst.max((p - mv).length());
                    }
                }
                worst
            };
            let mut best = candidates[0];
            let mut best_dist = worst_dist(best);
            for &cand in &candidates[1..] {
                let d = worst_dist(cand);
                if d < best_dist {
                    best = cand;
                    best_dist = d;
                }
            }
            if best_dist >= max_bounding_box_dim {
                break;
            }

            grouped[best] = true;
            members.push(best);
            member_verts.extend(tris[best].verts.iter().map(|&v| mesh.vertices[v as usize]));
        }

        memberships.push(members);
    }

    // ── 4. Cluster boxes ──
    let mut clusters: Vec<Cluster> = Vec::with_capacity(memberships.len());
    for members in &memberships {
        let faces: Vec<Face> = members
            .iter()
            .map(|&t| Face {
                verts: tris[t].verts,
                normal: tris[t].normal,
                centroid: tris[t].centroid,
                half_extents: tris[t].half_extents,
            })
            .collect();

        let mut vert_set: BTreeSet<u32> = BTreeSet::new();
        for &t in members {
            vert_set.extend(tris[t].verts);
        }
        let positions: Vec<Vec3> = vert_set.iter().map(|&v| mesh.vertices[v as usize]).collect();

        // Planar footprint from the hull; fall back to the vertex set when
        // the projection is degenerate. Height always comes from the vertex
        // set, since the XY hull carries no Z information.
        let hull = convex_hull_xy(&positions);
        let footprint: &[Vec3] = if hull.is_empty() { &positions } else { &hull };

        let mut min = footprint[0];
        let mut max = footprint[0];
        for p in footprint {
            min = min.min(*p);
            max = max.max(*p);
        }
        for p in &positions {
            min.z = min.z.min(p.z);
            max.z = max.z.max(p.z);
        }

        let centroid = (min + max) / 2.0;
        let half_extents = ((max - min) / 2.0).max(Vec3::splat(min_bounding_box_dim));

        clusters.push(Cluster {
            faces,
            edges: Vec::new(),
            unique_verts: Vec::new(),
            centroid,
            half_extents,
        });
    }

    // ── 5. Edge pairing (body-wide) ──
    let mut edge_owner: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
    let mut emitted: Vec<(usize, usize, (u32, u32))> = Vec::new();
    for (ci, cluster) in clusters.iter().enumerate() {
        for (fi, face) in cluster.faces.iter().enumerate() {
            for edge in directed_edges(face.verts) {
                edge_owner.insert(edge, (ci, fi));
                emitted.push((ci, fi, edge));
            }
        }
    }
    let mut consumed: HashSet<(u32, u32)> = HashSet::new();
    for (ci, fi, (a, b)) in emitted {
        if consumed.contains(&(a, b)) {
            continue;
        }
        consumed.insert((a, b));
        let twin = edge_owner.get(&(b, a)).copied();
        if twin.is_some() {
            consumed.insert((b, a));
        }
        clusters[ci].edges.push(ClusterEdge {
            verts: [a, b],
            face: FaceId(fi as u32),
            twin: twin.map(|(tc, tf)| (ClusterId(tc as u32), FaceId(tf as u32))),
        });
    }

    // ── 6. Unique vertex sets ──
    let mut seen: BTreeSet<u32> = BTreeSet::new();
    for cluster in &mut clusters {
        let mut mine: BTreeSet<u32> = BTreeSet::new();
        for face in &cluster.faces {
            mine.extend(face.verts);
        }
        cluster.unique_verts = mine.difference(&seen).copied().collect();
        seen.extend(mine);
    }

    Ok(clusters)
}
