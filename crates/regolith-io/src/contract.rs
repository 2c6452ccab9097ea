//! Scenario contract types.
//!
//! Serializable for CLI configuration and result transport.

use serde::{Deserialize, Serialize};

use regolith_math::{Quat, Vec3};
use regolith_mesh::ContactMesh;

/// Whether a scenario body responds to impulses or follows an imposed
/// trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BodyRole {
    /// Full 6-DoF body with mass and diagonal inertia (kg, kg m^2).
    Dynamic {
        /// Body mass.
        mass: f64,
        /// Diagonal of the body-frame inertia tensor.
        inertia_diag: [f64; 3],
    },
    /// Trajectory imposed externally; infinite mass to the solver.
    Kinematic,
}

/// Initial kinematic state of a scenario body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialState {
    /// Position in the inertial frame.
    pub position: Vec3,
    /// Velocity in the inertial frame.
    pub velocity: Vec3,
    /// Unit rotation from body to inertial frame.
    pub attitude: Quat,
    /// Angular velocity in the body frame.
    pub omega_b: Vec3,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            attitude: Quat::IDENTITY,
            omega_b: Vec3::ZERO,
        }
    }
}

/// One body in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySpec {
    /// Model tag for logs and result reporting.
    pub tag: String,
    /// Dynamic or kinematic role.
    pub role: BodyRole,
    /// Triangulated geometry in body frame.
    pub mesh: ContactMesh,
    /// Bounding sphere radius (meters).
    pub bounding_radius: f64,
    /// Coefficient of restitution, in `[0, 1]`.
    pub restitution: f64,
    /// Coefficient of friction, `>= 0`.
    pub friction: f64,
    /// State at scenario start.
    #[serde(default)]
    pub initial: InitialState,
}

/// Run parameters for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Total simulated time (seconds).
    pub duration: f64,
    /// Host integration step (seconds).
    pub dt: f64,
    /// Cluster growth cap handed to mesh preprocessing (meters).
    pub max_bounding_box_dim: f64,
    /// Positional-error acceptance threshold (meters).
    pub max_pos_error: f64,
    /// RK4 step size for the impulse ODE.
    pub collision_integration_step: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            duration: 1.0,
            dt: 1.0e-3,
            max_bounding_box_dim: 0.5,
            max_pos_error: 1.0e-3,
            collision_integration_step: 1.0e-4,
        }
    }
}

/// Complete input specification for a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Bodies, in registration order.
    pub bodies: Vec<BodySpec>,
    /// Run parameters.
    #[serde(default)]
    pub params: ScenarioParams,
}

/// Final state of one body after a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalBodyState {
    /// The body's tag.
    pub tag: String,
    /// Final position in the inertial frame.
    pub position: Vec3,
    /// Final velocity in the inertial frame.
    pub velocity: Vec3,
    /// Final angular velocity in the body frame.
    pub omega_b: Vec3,
}

/// Aggregate metrics from a scenario run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Total wall-clock time (seconds).
    pub wall_time_seconds: f64,
    /// Macro steps executed.
    pub step_count: u32,
    /// Steps in which a physical impulse was applied.
    pub impact_steps: u32,
    /// Steps rejected through the sentinel before resolving.
    pub sentinel_rejections: u32,
}

/// Output from a completed scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    /// Per-body final states, in registration order.
    pub final_states: Vec<FinalBodyState>,
    /// Run-wide metrics.
    pub metrics: ScenarioMetrics,
}
