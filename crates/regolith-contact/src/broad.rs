//! Broad-phase collision filtering.
//!
//! Two swept tiers over one integration step:
//! 1. *Sphere pass* — bounding-sphere overlap on the swept displacement of
//!    each unordered body pair
//! 2. *OBB pass* — for each admitted pair, the 15 separating-axis
//!    candidates of a swept OBB-OBB query between every cluster pair
//!
//! A cluster pair is admitted only if no candidate axis separates it
//! anywhere in the step.

use regolith_body::{Body, BodyRegistry, KinematicState};
use regolith_math::{Vec3, VectorInterval};
use regolith_mesh::Cluster;
use regolith_types::{BodyId, ClusterId};

/// A body pair admitted by the sphere pass, with the cluster pairs the OBB
/// pass kept alive.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    /// First body (registration order; always `first < second`).
    pub first: BodyId,
    /// Second body.
    pub second: BodyId,
    /// Admitted cluster pairs `(cluster of first, cluster of second)`.
    pub overlaps: Vec<(ClusterId, ClusterId)>,
}

/// A cluster's oriented bounding box swept across the step.
struct SweptObb {
    axes: [VectorInterval; 3],
    half: Vec3,
}

impl SweptObb {
    fn new(cluster: &Cluster, start: &KinematicState, end: &KinematicState, fudge: f64) -> Self {
        let r0 = start.rot_body_to_world();
        let r1 = end.rot_body_to_world();
        Self {
            axes: [
                VectorInterval::new(r0.col(0), r1.col(0)),
                VectorInterval::new(r0.col(1), r1.col(1)),
                VectorInterval::new(r0.col(2), r1.col(2)),
            ],
            half: cluster.half_extents * fudge,
        }
    }

    /// Swept world-frame center of the box.
    fn center(cluster: &Cluster, start: &KinematicState, end: &KinematicState) -> VectorInterval {
        VectorInterval::new(start.to_world(cluster.centroid), end.to_world(cluster.centroid))
    }
}

/// Tests one candidate axis: separated when the projected center distance
/// exceeds the summed projected half-extents everywhere in the step.
fn separating_axis(
    displacement: &VectorInterval,
    candidate: &VectorInterval,
    box1: &SweptObb,
    box2: &SweptObb,
) -> bool {
    let lhs = candidate.dot(displacement).max_abs();

    let mut rhs = 0.0;
    for (axis, h) in box1.axes.iter().zip([box1.half.x, box1.half.y, box1.half.z]) {
        rhs += h * candidate.dot(axis).max_abs();
    }
    for (axis, h) in box2.axes.iter().zip([box2.half.x, box2.half.y, box2.half.z]) {
        rhs += h * candidate.dot(axis).max_abs();
    }

    lhs > rhs
}

/// Sphere pass: admits unordered body pairs whose swept bounding spheres
/// overlap at either end of the step.
pub fn sphere_pass(registry: &BodyRegistry) -> Vec<(BodyId, BodyId)> {
    let bodies: Vec<&Body> = registry.bodies().collect();
    let mut pairs = Vec::new();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let diff = VectorInterval::new(
                bodies[i].state.position - bodies[j].state.position,
                bodies[i].end_state.position - bodies[j].end_state.position,
            );
            let dist_sq = diff.dot(&diff);
            let reach = bodies[i].params.bounding_radius + bodies[j].params.bounding_radius;
            if dist_sq.lo.abs().sqrt() < reach || dist_sq.hi.abs().sqrt() < reach {
                pairs.push((BodyId(i as u32), BodyId(j as u32)));
            }
        }
    }
    pairs
}

/// OBB pass over one body pair: returns the cluster pairs no axis separates.
pub fn cluster_overlaps(
    body1: &Body,
    body2: &Body,
    s1: &KinematicState,
    e1: &KinematicState,
    s2: &KinematicState,
    e2: &KinematicState,
    fudge: f64,
) -> Vec<(ClusterId, ClusterId)> {
    let mut overlaps = Vec::new();

    for (c1, cluster1) in body1.clusters.iter().enumerate() {
        let box1 = SweptObb::new(cluster1, s1, e1, fudge);
        let center1 = SweptObb::center(cluster1, s1, e1);

        'cluster2: for (c2, cluster2) in body2.clusters.iter().enumerate() {
            let box2 = SweptObb::new(cluster2, s2, e2, fudge);
            let displacement = center1 - SweptObb::center(cluster2, s2, e2);

            for axis in box1.axes.iter().chain(box2.axes.iter()) {
                if separating_axis(&displacement, axis, &box1, &box2) {
                    continue 'cluster2;
                }
            }
            for a1 in &box1.axes {
                for a2 in &box2.axes {
                    if separating_axis(&displacement, &a1.cross(a2), &box1, &box2) {
                        continue 'cluster2;
                    }
                }
            }

            overlaps.push((ClusterId(c1 as u32), ClusterId(c2 as u32)));
        }
    }
    overlaps
}

/// Runs both broad-phase tiers over the whole registry.
///
/// Pairs whose OBB pass comes back empty are still reported: the narrow
/// phase finding nothing for an admitted sphere pair is what drives the
/// coordinator's step-rejection sentinel.
pub fn broad_phase(registry: &BodyRegistry, fudge: f64) -> Vec<CandidatePair> {
    sphere_pass(registry)
        .into_iter()
        .map(|(first, second)| {
            let body1 = registry.body(first);
            let body2 = registry.body(second);
            let overlaps = cluster_overlaps(
                body1,
                body2,
                &body1.state,
                &body1.end_state,
                &body2.state,
                &body2.end_state,
                fudge,
            );
            CandidatePair {
                first,
                second,
                overlaps,
            }
        })
        .collect()
}
