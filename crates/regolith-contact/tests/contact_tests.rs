//! Integration tests for regolith-contact.

use regolith_body::{Body, BodyKind, ContactParams, KinematicState, MassProps};
use regolith_contact::{
    broad_phase, detect_contacts, Contact, ContactKind, ContactSet, SegmentClosest,
};
use regolith_contact::geometry::{project_into_triangle, segment_closest_points};
use regolith_math::{Mat3, Quat, Vec3};
use regolith_mesh::generators::{panel, unit_cube};
use regolith_mesh::{build_clusters, ContactMesh};
use regolith_types::ClusterId;

fn make_body(mesh: &ContactMesh, kind: BodyKind, state: KinematicState, dt: f64) -> Body {
    let clusters = build_clusters(mesh, 10.0, 0.005).unwrap();
    Body {
        tag: "test".into(),
        kind,
        params: ContactParams {
            bounding_radius: 10.0,
            restitution: 0.5,
            friction: 0.0,
        },
        vertices: mesh.vertices.clone(),
        clusters,
        mass: match kind {
            BodyKind::Dynamic => Some(MassProps {
                mass: 1.0,
                inertia_b: Mat3::from_diagonal(Vec3::splat(1.0 / 6.0)),
                inertia_b_inv: Mat3::from_diagonal(Vec3::splat(6.0)),
            }),
            BodyKind::Kinematic => None,
        },
        state,
        end_state: state.extrapolate(dt),
    }
}

fn resting_state(position: Vec3, velocity: Vec3) -> KinematicState {
    KinematicState {
        position,
        velocity,
        attitude: Quat::IDENTITY,
        ..Default::default()
    }
}

fn all_overlaps(body1: &Body, body2: &Body) -> Vec<(ClusterId, ClusterId)> {
    let mut overlaps = Vec::new();
    for c1 in 0..body1.clusters.len() {
        for c2 in 0..body2.clusters.len() {
            overlaps.push((ClusterId(c1 as u32), ClusterId(c2 as u32)));
        }
    }
    overlaps
}

fn detect(body1: &Body, body2: &Body, max_pos_error: f64) -> ContactSet {
    detect_contacts(
        body1,
        body2,
        &body1.state,
        &body1.end_state,
        &body2.state,
        &body2.end_state,
        &all_overlaps(body1, body2),
        max_pos_error,
    )
}

// ─── Geometry Tests ───────────────────────────────────────────

#[test]
fn projection_inside_triangle() {
    let v0 = Vec3::new(0.0, 0.0, 0.0);
    let v1 = Vec3::new(2.0, 0.0, 0.0);
    let v2 = Vec3::new(0.0, 2.0, 0.0);

    let hit = project_into_triangle(Vec3::new(0.5, 0.5, 0.3), v0, v1, v2).unwrap();
    assert!((hit.distance - 0.3).abs() < 1e-12);
    assert!((hit.point - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-12);

    assert!(project_into_triangle(Vec3::new(3.0, 3.0, 0.3), v0, v1, v2).is_none());
    assert!(project_into_triangle(Vec3::new(-1.0, -1.0, 0.3), v0, v1, v2).is_none());
}

#[test]
fn segments_crossing_at_right_angles() {
    // Edge along x at z=0.1 over edge along y at z=0.
    let result = segment_closest_points(
        Vec3::new(-1.0, 0.0, 0.1),
        Vec3::new(1.0, 0.0, 0.1),
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    );
    match result {
        SegmentClosest::Crossing { point_a, point_b } => {
            assert!((point_a - Vec3::new(0.0, 0.0, 0.1)).length() < 1e-12);
            assert!((point_b - Vec3::ZERO).length() < 1e-12);
        }
        other => panic!("expected crossing, got {:?}", other),
    }
}

#[test]
fn segments_missing_each_other_are_disjoint() {
    let result = segment_closest_points(
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(-0.5, 0.0, 0.0),
        Vec3::new(2.0, -1.0, 0.5),
        Vec3::new(2.0, 1.0, 0.5),
    );
    assert_eq!(result, SegmentClosest::Disjoint);
}

#[test]
fn parallel_overlapping_segments_resolve_by_projection() {
    let result = segment_closest_points(
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.5, 0.0, 0.2),
        Vec3::new(1.5, 0.0, 0.2),
    );
    match result {
        SegmentClosest::ParallelOverlap { point_a, point_b } => {
            assert!((point_a.z - 0.0).abs() < 1e-12);
            assert!((point_b.z - 0.2).abs() < 1e-12);
        }
        other => panic!("expected parallel overlap, got {:?}", other),
    }
}

// ─── Broad Phase Tests ────────────────────────────────────────

#[test]
fn touching_spheres_with_disjoint_boxes_yield_no_overlap() {
    use regolith_body::{BodyRegistry, MassPropsMsg, SharedBuffer, StateMsg};

    let mut registry = BodyRegistry::new();
    let mass = MassPropsMsg {
        mass: 1.0,
        inertia_b: Mat3::from_diagonal(Vec3::splat(1.0 / 6.0)),
    };
    let state_at = |x: f64| StateMsg {
        position: Vec3::new(x, 0.0, 0.0),
        velocity: Vec3::ZERO,
        attitude: Quat::IDENTITY,
        omega_b: Vec3::ZERO,
        omega_dot_b: Vec3::ZERO,
        accel_nc_b: Vec3::ZERO,
    };
    let params = ContactParams {
        bounding_radius: 1.0,
        restitution: 0.5,
        friction: 0.0,
    };
    registry
        .add_dynamic(
            &unit_cube(),
            "a",
            Box::new(SharedBuffer::new(state_at(0.0))),
            Box::new(SharedBuffer::new(mass)),
            params,
            10.0,
            0.005,
        )
        .unwrap();
    registry
        .add_dynamic(
            &unit_cube(),
            "b",
            Box::new(SharedBuffer::new(state_at(1.8))),
            Box::new(SharedBuffer::new(mass)),
            params,
            10.0,
            0.005,
        )
        .unwrap();
    registry.ingest(0.001).unwrap();

    let pairs = broad_phase(&registry, 1.0);
    // Spheres (radius 1 each, centers 1.8 apart) overlap, so the pair is
    // admitted; the boxes (half-extent 0.5) never touch.
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].overlaps.is_empty());
}

#[test]
fn approaching_cubes_overlap_in_broad_phase() {
    use regolith_body::{BodyRegistry, MassPropsMsg, SharedBuffer, StateMsg};

    let mut registry = BodyRegistry::new();
    let mass = MassPropsMsg {
        mass: 1.0,
        inertia_b: Mat3::from_diagonal(Vec3::splat(1.0 / 6.0)),
    };
    let params = ContactParams {
        bounding_radius: 1.0,
        restitution: 0.5,
        friction: 0.0,
    };
    let moving = StateMsg {
        position: Vec3::new(-0.51, 0.0, 0.0),
        velocity: Vec3::new(1.0, 0.0, 0.0),
        attitude: Quat::IDENTITY,
        omega_b: Vec3::ZERO,
        omega_dot_b: Vec3::ZERO,
        accel_nc_b: Vec3::ZERO,
    };
    let still = StateMsg {
        position: Vec3::new(0.51, 0.0, 0.0),
        velocity: Vec3::ZERO,
        attitude: Quat::IDENTITY,
        omega_b: Vec3::ZERO,
        omega_dot_b: Vec3::ZERO,
        accel_nc_b: Vec3::ZERO,
    };
    registry
        .add_dynamic(
            &unit_cube(),
            "mover",
            Box::new(SharedBuffer::new(moving)),
            Box::new(SharedBuffer::new(mass)),
            params,
            10.0,
            0.005,
        )
        .unwrap();
    registry
        .add_dynamic(
            &unit_cube(),
            "target",
            Box::new(SharedBuffer::new(still)),
            Box::new(SharedBuffer::new(mass)),
            params,
            10.0,
            0.005,
        )
        .unwrap();
    registry.ingest(0.05).unwrap();

    let pairs = broad_phase(&registry, 1.0);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].overlaps.len(), 1);
}

// ─── Narrow Phase Tests ───────────────────────────────────────

#[test]
fn falling_cube_contacts_panel_at_four_corners() {
    let gap = 1e-4;
    let cube = make_body(
        &unit_cube(),
        BodyKind::Dynamic,
        resting_state(Vec3::new(0.0, 0.0, 0.5 + gap), Vec3::new(0.0, 0.0, -1.0)),
        1e-3,
    );
    let ground = make_body(
        &panel(2.0),
        BodyKind::Kinematic,
        resting_state(Vec3::ZERO, Vec3::ZERO),
        1e-3,
    );

    let set = detect(&cube, &ground, 1e-3);

    assert_eq!(set.len(), 4, "one contact per bottom corner");
    assert!((set.max_error() - gap).abs() < 1e-9);
    for contact in set.contacts() {
        // Normal along the impulse on the cube: straight up.
        assert!((contact.normal - Vec3::Z).length() < 1e-9);
        // Contact points sit at the bottom corners.
        assert!((contact.point_a.x.abs() - 0.5).abs() < 1e-9);
        assert!((contact.point_a.y.abs() - 0.5).abs() < 1e-9);
    }
}

#[test]
fn separating_cube_produces_no_contacts() {
    let cube = make_body(
        &unit_cube(),
        BodyKind::Dynamic,
        resting_state(Vec3::new(0.0, 0.0, 0.5 + 1e-4), Vec3::new(0.0, 0.0, 1.0)),
        1e-3,
    );
    let ground = make_body(
        &panel(2.0),
        BodyKind::Kinematic,
        resting_state(Vec3::ZERO, Vec3::ZERO),
        1e-3,
    );

    let set = detect(&cube, &ground, 1e-3);
    assert!(set.is_empty(), "receding bodies must not contact");
}

#[test]
fn contacts_are_deduplicated_within_a_millimeter() {
    let gap = 1e-4;
    let cube = make_body(
        &unit_cube(),
        BodyKind::Dynamic,
        resting_state(Vec3::new(0.0, 0.0, 0.5 + gap), Vec3::new(0.0, 0.0, -1.0)),
        1e-3,
    );
    let ground = make_body(
        &panel(2.0),
        BodyKind::Kinematic,
        resting_state(Vec3::ZERO, Vec3::ZERO),
        1e-3,
    );

    let set = detect(&cube, &ground, 1e-3);
    // Two bottom corners sit exactly on the panel's shared diagonal; the
    // vertex-face and edge-edge reports must collapse to one contact each.
    let contacts = set.contacts();
    for (i, a) in contacts.iter().enumerate() {
        for b in contacts.iter().skip(i + 1) {
            assert!(
                (a.point_a - b.point_a).length() >= 1e-3
                    && (a.point_b - b.point_b).length() >= 1e-3,
                "contacts closer than the dedup radius survived"
            );
        }
    }
}

#[test]
fn crossed_edges_contact_picks_opposing_normal() {
    // Upper cube rotated 45 degrees about z, dropping onto the lower cube:
    // their top/bottom edges cross at right angles.
    let gap = 1e-4;
    let lower = make_body(
        &unit_cube(),
        BodyKind::Kinematic,
        resting_state(Vec3::ZERO, Vec3::ZERO),
        1e-3,
    );
    let upper_state = KinematicState {
        position: Vec3::new(0.0, 0.0, 1.0 + gap),
        velocity: Vec3::new(0.0, 0.0, -1.0),
        attitude: Quat::from_rotation_z(std::f64::consts::FRAC_PI_4),
        ..Default::default()
    };
    let upper = make_body(&unit_cube(), BodyKind::Dynamic, upper_state, 1e-3);

    let set = detect(&upper, &lower, 1e-3);
    assert!(!set.is_empty(), "crossed edges must register contact");
    for contact in set.contacts() {
        // Non-penetration direction: normal opposes the upper cube's
        // downward approach.
        assert!(
            contact.normal.dot(Vec3::new(0.0, 0.0, -1.0)) < 0.0,
            "normal {:?} does not oppose the approach",
            contact.normal
        );
    }
}

// ─── Contact Record Tests ─────────────────────────────────────

#[test]
fn contact_serialization_round_trip() {
    let contact = Contact {
        kind: ContactKind::VertexFace,
        point_a: Vec3::new(1.0, 2.0, 3.0),
        point_b: Vec3::new(1.0, 2.0, 2.9),
        normal: Vec3::Z,
        pos_error: 0.1,
    };
    let json = serde_json::to_string(&contact).unwrap();
    let recovered: Contact = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.kind, ContactKind::VertexFace);
    assert!((recovered.point_a - contact.point_a).length() < 1e-12);
}

#[test]
fn contact_set_tracks_error_extrema() {
    let mut set = ContactSet::new();
    let mut contact = Contact {
        kind: ContactKind::VertexFace,
        point_a: Vec3::ZERO,
        point_b: Vec3::ZERO,
        normal: Vec3::Z,
        pos_error: 0.2,
    };
    set.insert(contact);

    contact.point_a = Vec3::new(1.0, 0.0, 0.0);
    contact.point_b = Vec3::new(1.0, 0.0, 0.0);
    contact.pos_error = 0.05;
    set.insert(contact);

    assert_eq!(set.len(), 2);
    assert!((set.max_error() - 0.2).abs() < 1e-15);
    assert!((set.min_error() - 0.05).abs() < 1e-15);
}
