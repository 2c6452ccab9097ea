//! # regolith-io
//!
//! Scenario input/output contract types for the Regolith contact engine.
//!
//! These types define the transport boundary: a scenario file carries the
//! bodies (inline vertex/index arrays — mesh *file* parsing happens
//! upstream), their contact parameters and initial states, and the knobs a
//! run needs. The validator catches data-level errors before registration.

pub mod contract;
pub mod validator;

pub use contract::{
    BodyRole, BodySpec, FinalBodyState, InitialState, ScenarioInput, ScenarioMetrics,
    ScenarioOutput, ScenarioParams,
};
pub use validator::validate_scenario;
