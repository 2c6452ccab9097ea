//! Physical constants and engine defaults.

/// Nanoseconds to seconds.
pub const NANO_TO_SEC: f64 = 1.0e-9;

/// Default minimum per-axis cluster bounding-box half-extent (meters).
/// Keeps swept separating-axis tests from collapsing to zero width.
pub const DEFAULT_MIN_BOUNDING_BOX_DIM: f64 = 0.005;

/// Default fudge factor applied to cluster half-extents in the broad phase.
pub const DEFAULT_BOUNDING_BOX_FF: f64 = 1.0;

/// Default advisory upper bound on the host integration step (seconds).
pub const DEFAULT_MAX_TIME_STEP: f64 = 0.001;

/// Default tolerance for matching cached solutions against repeated calls.
pub const DEFAULT_TIME_SYNCH_TOL: f64 = 1.0e-9;

/// Radius within which two contact points are considered duplicates (meters).
pub const CONTACT_DEDUP_RADIUS: f64 = 1.0e-3;

/// Tolerance for the swept triple-product straddle test.
pub const STRADDLE_TOL: f64 = 1.0e-12;

/// Face area threshold below which a triangle is treated as degenerate.
pub const DEGENERATE_AREA_THRESHOLD: f64 = 1.0e-10;

/// Magnitude of the restitution-work seed applied at solver start.
pub const RESTITUTION_WORK_SEED: f64 = 1.0e-14;
