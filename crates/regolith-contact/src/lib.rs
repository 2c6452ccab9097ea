//! # regolith-contact
//!
//! Collision detection for the Regolith contact engine.
//!
//! Detection is split into two swept phases operating on interval
//! arithmetic over one integration step:
//! 1. **Broad phase** — bounding-sphere overlap, then a swept OBB
//!    separating-axis test between cluster pairs
//! 2. **Narrow phase** — swept vertex-in-face and edge-edge intersection
//!    tests producing deduplicated contact records with a positional error
//!    metric
//!
//! Both phases are conservative: a pair that might touch anywhere inside
//! the step is admitted, and the impulse solver decides what the contact
//! actually does.

pub mod broad;
pub mod contact;
pub mod geometry;
pub mod narrow;

pub use broad::{broad_phase, sphere_pass, CandidatePair};
pub use contact::{Contact, ContactKind, ContactSet};
pub use geometry::{project_into_triangle, segment_closest_points, FaceProjection, SegmentClosest};
pub use narrow::detect_contacts;
