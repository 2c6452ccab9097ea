//! # regolith-body
//!
//! Body registry and per-cycle state ingestion for the Regolith contact
//! engine.
//!
//! A body couples immutable geometry (vertices plus preprocessed clusters),
//! contact parameters, and the mutable kinematic state pulled from the host
//! simulator's message sources each cycle. Dynamic bodies carry full 6-DoF
//! kinematics with mass and inertia; kinematic bodies have their pose and
//! velocities imposed externally and are treated by the solver as infinitely
//! massive.

pub mod body;
pub mod registry;
pub mod sources;
pub mod state;

pub use body::{Body, BodyKind, ContactParams, MassProps};
pub use registry::BodyRegistry;
pub use sources::{
    EphemerisMsg, EphemerisSource, MassPropsMsg, MassPropsSource, SharedBuffer, StateMsg,
    StateSource,
};
pub use state::KinematicState;
