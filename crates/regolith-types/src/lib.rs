//! # regolith-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the Regolith rigid-body contact engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Regolith crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{RegolithError, RegolithResult};
pub use ids::{BodyId, ClusterId, FaceId};
pub use scalar::Scalar;
