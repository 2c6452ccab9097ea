//! Scalar type alias for the engine.
//!
//! Contact resolution for spacecraft-class bodies runs entirely on the CPU
//! and benefits from double precision (sub-millimeter positional errors on
//! kilometer-scale trajectories). This alias makes it easy to experiment
//! with `f32` if a GPU path is ever added.

/// The floating-point type used throughout the engine.
pub type Scalar = f64;
