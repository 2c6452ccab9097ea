//! Scenario validation.
//!
//! Validates scenario inputs before the registry receives them, catching
//! data-level errors early with clear diagnostics.

use regolith_types::{RegolithError, RegolithResult};

use crate::contract::{BodyRole, ScenarioInput};

/// Validates a complete scenario input.
///
/// Checks:
/// - At least one body, at least one of them dynamic
/// - Mesh integrity for every body (triangles only, indices in range)
/// - Contact parameters in physical range
/// - Run parameters are usable
pub fn validate_scenario(input: &ScenarioInput) -> RegolithResult<()> {
    if input.bodies.is_empty() {
        return Err(RegolithError::InvalidConfig(
            "Scenario contains no bodies".into(),
        ));
    }
    if !input
        .bodies
        .iter()
        .any(|b| matches!(b.role, BodyRole::Dynamic { .. }))
    {
        return Err(RegolithError::InvalidConfig(
            "Scenario contains no dynamic body".into(),
        ));
    }

    for body in &input.bodies {
        body.mesh
            .validate()
            .map_err(|e| RegolithError::InvalidMesh(format!("Body '{}': {}", body.tag, e)))?;

        if body.bounding_radius <= 0.0 {
            return Err(RegolithError::InvalidBody(format!(
                "Body '{}' has non-positive bounding radius",
                body.tag
            )));
        }
        if !(0.0..=1.0).contains(&body.restitution) {
            return Err(RegolithError::InvalidBody(format!(
                "Body '{}' restitution must be in [0, 1], got {}",
                body.tag, body.restitution
            )));
        }
        if body.friction < 0.0 {
            return Err(RegolithError::InvalidBody(format!(
                "Body '{}' friction must be non-negative",
                body.tag
            )));
        }
        if let BodyRole::Dynamic { mass, inertia_diag } = &body.role {
            if *mass <= 0.0 {
                return Err(RegolithError::InvalidBody(format!(
                    "Body '{}' has non-positive mass {}",
                    body.tag, mass
                )));
            }
            if inertia_diag.iter().any(|&i| i <= 0.0) {
                return Err(RegolithError::InvalidBody(format!(
                    "Body '{}' has a non-positive inertia component",
                    body.tag
                )));
            }
        }
    }

    let params = &input.params;
    if params.dt <= 0.0 {
        return Err(RegolithError::InvalidConfig(
            "Timestep dt must be positive".into(),
        ));
    }
    if params.duration <= 0.0 {
        return Err(RegolithError::InvalidConfig(
            "Duration must be positive".into(),
        ));
    }
    if params.max_bounding_box_dim <= 0.0 {
        return Err(RegolithError::InvalidConfig(
            "max_bounding_box_dim must be positive".into(),
        ));
    }
    if params.max_pos_error <= 0.0 {
        return Err(RegolithError::InvalidConfig(
            "max_pos_error must be positive".into(),
        ));
    }
    if params.collision_integration_step <= 0.0 {
        return Err(RegolithError::InvalidConfig(
            "collision_integration_step must be positive".into(),
        ));
    }

    Ok(())
}
