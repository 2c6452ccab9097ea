//! # regolith-solver
//!
//! Collision dynamics for the Regolith contact engine.
//!
//! Two layers:
//! - [`impulse`] — the reduced-coordinate impulse integrator: assembles a
//!   contact-frame inverse-mass matrix across all simultaneous contacts and
//!   integrates Stronge's energetic restitution law (with Coulomb friction)
//!   by RK4 until every contact completes compression and restitution.
//! - [`effector`] — the cycle coordinator the host integrator talks to:
//!   per-cycle ingestion, broad + narrow phase orchestration, impulse
//!   caching across repeated calls, and the step-rejection sentinel.

pub mod config;
pub mod effector;
pub mod frame;
pub mod impulse;
pub mod sentinel;

pub use config::ContactConfig;
pub use effector::{BodyLoad, ContactEffector};
pub use impulse::{resolve_impacts, ImpulseOutcome};
