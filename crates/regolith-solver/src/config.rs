//! Contact-engine configuration.

use serde::{Deserialize, Serialize};

use regolith_types::constants;
use regolith_types::{RegolithError, RegolithResult};

/// Configuration for the contact engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Cluster growth cap: maximum pairwise vertex distance inside one
    /// cluster (meters).
    pub max_bounding_box_dim: f64,

    /// Minimum per-axis cluster bounding-box half-extent (meters).
    pub min_bounding_box_dim: f64,

    /// Fudge factor inflating cluster half-extents in the broad phase.
    pub bounding_box_ff: f64,

    /// Advisory upper bound on the host integration step (seconds); also
    /// the extrapolation horizon used when a cycle begins.
    pub max_time_step: f64,

    /// Tolerance for matching cached solutions against repeated calls.
    pub time_synch_tol: f64,

    /// Largest acceptable positional error before the coordinator rejects
    /// the step (meters).
    pub max_pos_error: f64,

    /// Tangential speed below which a contact is treated as non-slipping
    /// and friction is left out of the impulse direction.
    pub slip_tolerance: f64,

    /// RK4 step size for the impulse ODE (impulse units).
    pub collision_integration_step: f64,

    /// Hard cap on RK4 iterations per impulse solve.
    pub max_solver_iterations: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            max_bounding_box_dim: 0.5,
            min_bounding_box_dim: constants::DEFAULT_MIN_BOUNDING_BOX_DIM,
            bounding_box_ff: constants::DEFAULT_BOUNDING_BOX_FF,
            max_time_step: constants::DEFAULT_MAX_TIME_STEP,
            time_synch_tol: constants::DEFAULT_TIME_SYNCH_TOL,
            max_pos_error: 1.0e-3,
            slip_tolerance: 1.0e-8,
            collision_integration_step: 1.0e-4,
            max_solver_iterations: 10_000_000,
        }
    }
}

impl ContactConfig {
    /// Validates that every knob is in a usable range.
    pub fn validate(&self) -> RegolithResult<()> {
        if self.max_bounding_box_dim <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "max_bounding_box_dim must be positive".into(),
            ));
        }
        if self.min_bounding_box_dim <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "min_bounding_box_dim must be positive".into(),
            ));
        }
        if self.bounding_box_ff < 1.0 {
            return Err(RegolithError::InvalidConfig(
                "bounding_box_ff below 1.0 would shrink cluster boxes".into(),
            ));
        }
        if self.max_time_step <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "max_time_step must be positive".into(),
            ));
        }
        if self.time_synch_tol <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "time_synch_tol must be positive".into(),
            ));
        }
        if self.max_pos_error <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "max_pos_error must be positive".into(),
            ));
        }
        if self.collision_integration_step <= 0.0 {
            return Err(RegolithError::InvalidConfig(
                "collision_integration_step must be positive".into(),
            ));
        }
        if self.max_solver_iterations == 0 {
            return Err(RegolithError::InvalidConfig(
                "max_solver_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
