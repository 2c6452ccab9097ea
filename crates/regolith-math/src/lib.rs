//! # regolith-math
//!
//! Linear algebra primitives for the Regolith contact engine.
//!
//! Provides:
//! - Re-exports of double-precision `glam` types (`Vec3`, `Mat3`, `Quat`)
//! - Interval arithmetic over swept vectors (used by the broad and narrow phases)
//! - 2D convex hull via Graham scan (used for cluster bounding boxes)
//! - Dense block matrix backed by `faer` (contact-frame inverse-mass matrix)

pub mod block;
pub mod hull;
pub mod interval;

// Re-export double-precision glam types as the canonical math types for Regolith.
pub use glam::{DMat3 as Mat3, DQuat as Quat, DVec3 as Vec3};

pub use block::BlockMat3;
pub use hull::convex_hull_xy;
pub use interval::{ScalarInterval, VectorInterval};
