//! Integration tests for regolith-io.

use regolith_io::{
    validate_scenario, BodyRole, BodySpec, InitialState, ScenarioInput, ScenarioParams,
};
use regolith_math::Vec3;
use regolith_mesh::generators::{panel, unit_cube};
use regolith_types::RegolithError;

fn lander_spec() -> BodySpec {
    BodySpec {
        tag: "lander".into(),
        role: BodyRole::Dynamic {
            mass: 1.0,
            inertia_diag: [1.0 / 6.0; 3],
        },
        mesh: unit_cube(),
        bounding_radius: 1.0,
        restitution: 0.5,
        friction: 0.3,
        initial: InitialState {
            position: Vec3::new(0.0, 0.0, 2.0),
            velocity: Vec3::new(0.0, 0.0, -1.0),
            ..Default::default()
        },
    }
}

fn ground_spec() -> BodySpec {
    BodySpec {
        tag: "ground".into(),
        role: BodyRole::Kinematic,
        mesh: panel(5.0),
        bounding_radius: 8.0,
        restitution: 0.5,
        friction: 0.3,
        initial: InitialState::default(),
    }
}

fn drop_scenario() -> ScenarioInput {
    ScenarioInput {
        bodies: vec![lander_spec(), ground_spec()],
        params: ScenarioParams::default(),
    }
}

#[test]
fn valid_scenario_passes() {
    assert!(validate_scenario(&drop_scenario()).is_ok());
}

#[test]
fn scenario_round_trips_through_json() {
    let scenario = drop_scenario();
    let json = serde_json::to_string(&scenario).unwrap();
    let recovered: ScenarioInput = serde_json::from_str(&json).unwrap();

    assert_eq!(recovered.bodies.len(), 2);
    assert_eq!(recovered.bodies[0].tag, "lander");
    assert_eq!(recovered.bodies[0].mesh.triangle_count(), 12);
    assert!((recovered.params.dt - 1e-3).abs() < 1e-15);
    assert!(validate_scenario(&recovered).is_ok());
}

#[test]
fn empty_scenario_is_rejected() {
    let scenario = ScenarioInput {
        bodies: Vec::new(),
        params: ScenarioParams::default(),
    };
    assert!(matches!(
        validate_scenario(&scenario),
        Err(RegolithError::InvalidConfig(_))
    ));
}

#[test]
fn all_kinematic_scenario_is_rejected() {
    let scenario = ScenarioInput {
        bodies: vec![ground_spec()],
        params: ScenarioParams::default(),
    };
    assert!(matches!(
        validate_scenario(&scenario),
        Err(RegolithError::InvalidConfig(_))
    ));
}

#[test]
fn non_positive_mass_is_rejected() {
    let mut scenario = drop_scenario();
    scenario.bodies[0].role = BodyRole::Dynamic {
        mass: -1.0,
        inertia_diag: [1.0; 3],
    };
    assert!(matches!(
        validate_scenario(&scenario),
        Err(RegolithError::InvalidBody(_))
    ));
}

#[test]
fn out_of_range_restitution_is_rejected() {
    let mut scenario = drop_scenario();
    scenario.bodies[1].restitution = 1.2;
    assert!(matches!(
        validate_scenario(&scenario),
        Err(RegolithError::InvalidBody(_))
    ));
}

#[test]
fn bad_timestep_is_rejected() {
    let mut scenario = drop_scenario();
    scenario.params.dt = 0.0;
    assert!(matches!(
        validate_scenario(&scenario),
        Err(RegolithError::InvalidConfig(_))
    ));
}

#[test]
fn broken_mesh_is_reported_with_body_tag() {
    let mut scenario = drop_scenario();
    scenario.bodies[0].mesh.groups[0].indices.push(7);
    let err = validate_scenario(&scenario).unwrap_err();
    assert!(err.to_string().contains("lander"));
}
