//! Narrow-phase collision detection.
//!
//! For every admitted cluster pair, three swept tests produce contact
//! records: vertex-in-face both ways, then edge-edge. Each test first
//! filters with a swept triple-product interval (does the primitive pair
//! cross anywhere in the step?) and only then localizes the touch at the
//! current instant.
//!
//! Contact normals point along the impulsive force applied to body 1: the
//! supporting face's outward normal when the face is on body 2, its
//! negation when the face is on body 1, and for edge-edge contacts the
//! adjacent body-2 face normal(s) opposing the relative surface velocity.

use regolith_body::{Body, KinematicState};
use regolith_math::{Vec3, VectorInterval};
use regolith_mesh::Cluster;
use regolith_types::constants::STRADDLE_TOL;
use regolith_types::ClusterId;

use crate::contact::{Contact, ContactKind, ContactSet};
use crate::geometry::{project_into_triangle, segment_closest_points, SegmentClosest};

/// Velocity projection below which a face normal counts as opposing the
/// relative motion.
const OPPOSING_TOL: f64 = -1.0e-12;

#[inline]
fn sweep(start: &KinematicState, end: &KinematicState, point_b: Vec3) -> VectorInterval {
    VectorInterval::new(start.to_world(point_b), end.to_world(point_b))
}

/// Runs the narrow phase over the admitted cluster pairs of one body pair.
///
/// `s*`/`e*` are the states at the current call instant and at the end of
/// the step; the coordinator re-extrapolates them per RK stage so repeated
/// calls see time-consistent geometry.
#[allow(clippy::too_many_arguments)]
pub fn detect_contacts(
    body1: &Body,
    body2: &Body,
    s1: &KinematicState,
    e1: &KinematicState,
    s2: &KinematicState,
    e2: &KinematicState,
    overlaps: &[(ClusterId, ClusterId)],
    max_pos_error: f64,
) -> ContactSet {
    let mut set = ContactSet::new();

    for &(c1, c2) in overlaps {
        let cluster1 = &body1.clusters[c1.index()];
        let cluster2 = &body2.clusters[c2.index()];

        // Faces of body 1 against the unique vertices of body 2.
        vertex_face_tests(
            body1, cluster1, s1, e1, body2, cluster2, s2, e2, true, &mut set, max_pos_error,
        );
        // Faces of body 2 against the unique vertices of body 1.
        vertex_face_tests(
            body2, cluster2, s2, e2, body1, cluster1, s1, e1, false, &mut set, max_pos_error,
        );
        // Edges of body 1 against edges of body 2.
        edge_edge_tests(
            body1, cluster1, s1, e1, body2, cluster2, s2, e2, &mut set, max_pos_error,
        );
    }

    set
}

#[allow(clippy::too_many_arguments)]
fn vertex_face_tests(
    face_body: &Body,
    face_cluster: &Cluster,
    fs: &KinematicState,
    fe: &KinematicState,
    vert_body: &Body,
    vert_cluster: &Cluster,
    vs: &KinematicState,
    ve: &KinematicState,
    face_on_body1: bool,
    set: &mut ContactSet,
    max_pos_error: f64,
) {
    for &vi in &vert_cluster.unique_verts {
        let vert_sweep = sweep(vs, ve, vert_body.vertices[vi as usize]);

        for face in &face_cluster.faces {
            let f0 = sweep(fs, fe, face_body.vertices[face.verts[0] as usize]);
            let f1 = sweep(fs, fe, face_body.vertices[face.verts[1] as usize]);
            let f2 = sweep(fs, fe, face_body.vertices[face.verts[2] as usize]);

            // Swept signed volume of the vertex against the face plane.
            let leg1 = f0 - f1;
            let leg2 = f0 - f2;
            let support = vert_sweep - f0;
            let triple = support.dot(&leg1.cross(&leg2));
            if !triple.straddles_zero(STRADDLE_TOL) {
                continue;
            }

            let Some(projection) =
                project_into_triangle(vert_sweep.lower, f0.lower, f1.lower, f2.lower)
            else {
                continue;
            };
            if !set.accepts(projection.distance, max_pos_error) {
                continue;
            }

            let outward = fs.attitude * face.normal;
            let (point_a, point_b, normal) = if face_on_body1 {
                (projection.point, vert_sweep.lower, -outward)
            } else {
                (vert_sweep.lower, projection.point, outward)
            };
            set.insert(Contact {
                kind: ContactKind::VertexFace,
                point_a,
                point_b,
                normal,
                pos_error: projection.distance,
            });

            // The vertex is claimed by the first face that accepts it;
            // neighbors sharing it would only duplicate the contact.
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn edge_edge_tests(
    body1: &Body,
    cluster1: &Cluster,
    s1: &KinematicState,
    e1: &KinematicState,
    body2: &Body,
    cluster2: &Cluster,
    s2: &KinematicState,
    e2: &KinematicState,
    set: &mut ContactSet,
    max_pos_error: f64,
) {
    for edge_a in &cluster1.edges {
        let a0 = sweep(s1, e1, body1.vertices[edge_a.verts[0] as usize]);
        let a1 = sweep(s1, e1, body1.vertices[edge_a.verts[1] as usize]);
        let dir_a = a1 - a0;

        for edge_b in &cluster2.edges {
            let b0 = sweep(s2, e2, body2.vertices[edge_b.verts[0] as usize]);
            let b1 = sweep(s2, e2, body2.vertices[edge_b.verts[1] as usize]);
            let dir_b = b1 - b0;

            let displacement = b0 - a0;
            let triple = displacement.dot(&dir_a.cross(&dir_b));
            if !(triple.lo < 0.0 && triple.hi > 0.0) {
                continue;
            }

            let (point_a, point_b) =
                match segment_closest_points(a0.lower, a1.lower, b0.lower, b1.lower) {
                    SegmentClosest::Crossing { point_a, point_b }
                    | SegmentClosest::ParallelOverlap { point_a, point_b } => (point_a, point_b),
                    SegmentClosest::Disjoint => continue,
                };
            let pos_error = (point_a - point_b).length();
            if !set.accepts(pos_error, max_pos_error) {
                continue;
            }

            // Pick the contact normal from the body-2 face(s) adjacent to
            // the edge, against the relative surface velocity.
            let n_face = s2.attitude * cluster2.faces[edge_b.face.index()].normal;
            let n_twin = edge_b
                .twin
                .map(|(tc, tf)| s2.attitude * body2.clusters[tc.index()].faces[tf.index()].normal);
            let v_rel = s1.surface_velocity(point_a) - s2.surface_velocity(point_b);

            let normal = match n_twin {
                Some(nt) if v_rel.dot(n_face) < OPPOSING_TOL && v_rel.dot(nt) < OPPOSING_TOL => {
                    (n_face + nt).normalize()
                }
                _ if v_rel.dot(n_face) < OPPOSING_TOL => n_face,
                Some(nt) if v_rel.dot(nt) < OPPOSING_TOL => nt,
                // Both adjacent faces point with the motion: grazing the
                // far side of the edge, not a physical contact.
                _ => continue,
            };

            set.insert(Contact {
                kind: ContactKind::EdgeEdge,
                point_a,
                point_b,
                normal,
                pos_error,
            });
        }
    }
}
