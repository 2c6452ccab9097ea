//! Body data: immutable geometry, contact parameters, and mutable state.

use regolith_math::{Mat3, Vec3};
use regolith_mesh::Cluster;

use crate::state::KinematicState;

/// Whether a body's motion responds to contact impulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Full 6-DoF kinematics with mass and inertia.
    Dynamic,
    /// Pose and velocities imposed externally; infinite mass to the solver.
    Kinematic,
}

/// Contact parameters of one body.
///
/// Restitution and friction are per-body scalars; contact physics is
/// pairwise, so supporting three or more interacting dynamic bodies needs a
/// pair-indexed table here instead.
#[derive(Debug, Clone, Copy)]
pub struct ContactParams {
    /// Bounding sphere radius (meters).
    pub bounding_radius: f64,
    /// Coefficient of restitution, in `[0, 1]`.
    pub restitution: f64,
    /// Coefficient of friction, `>= 0`.
    pub friction: f64,
}

/// Mass properties of a dynamic body, ingested each cycle.
#[derive(Debug, Clone, Copy)]
pub struct MassProps {
    /// Body mass (kg).
    pub mass: f64,
    /// Inertia tensor about the body origin, body frame.
    pub inertia_b: Mat3,
    /// Cached inverse of `inertia_b`.
    pub inertia_b_inv: Mat3,
}

/// One registered body.
pub struct Body {
    /// Model tag for logs and diagnostics.
    pub tag: String,
    /// Dynamic or kinematic.
    pub kind: BodyKind,
    /// Contact parameters.
    pub params: ContactParams,
    /// Body-frame vertex positions (immutable after registration).
    pub vertices: Vec<Vec3>,
    /// Preprocessed half-edge clusters (immutable after registration).
    pub clusters: Vec<Cluster>,
    /// Mass properties; `None` for kinematic bodies.
    pub mass: Option<MassProps>,
    /// State at the top of the current macro step.
    pub state: KinematicState,
    /// State extrapolated to the end of the macro step.
    pub end_state: KinematicState,
}

impl Body {
    /// Returns true when the body's trajectory is externally imposed.
    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.kind == BodyKind::Kinematic
    }
}
