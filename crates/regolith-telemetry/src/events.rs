//! Contact-engine event types.
//!
//! Structured events emitted at each stage of a contact-resolution cycle.
//! Events are lightweight value types carrying just enough data for
//! monitoring and debugging.

use serde::{Deserialize, Serialize};

/// An event emitted by the contact engine.
///
/// Events are stamped with the simulation time of the cycle they belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactEvent {
    /// Simulation time of the owning cycle (seconds).
    pub sim_time: f64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// Broad phase finished for a cycle.
    BroadPhase {
        /// Body pairs admitted by the sphere pass.
        close_pairs: u32,
        /// Cluster pairs surviving the swept OBB pass.
        cluster_overlaps: u32,
    },

    /// Narrow phase finished for one body pair.
    NarrowPhase {
        /// Contacts accepted after deduplication.
        contact_count: u32,
        /// Maximum positional error across accepted contacts (meters).
        max_pos_error: f64,
    },

    /// Impulse integration finished for one body pair.
    ImpulseSolve {
        /// Simultaneous contacts resolved.
        contact_count: u32,
        /// RK4 iterations used.
        iterations: u64,
        /// Whether the iteration cap cut the integration short.
        capped: bool,
    },

    /// The coordinator emitted the step-rejection sentinel.
    Sentinel {
        /// Why the cycle could not be resolved.
        reason: SentinelReason,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

/// Why a sentinel load was emitted instead of a physical impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentinelReason {
    /// The narrow phase found no contacts for an admitted pair.
    NoContacts,
    /// Every contact's positional error exceeded the acceptance threshold.
    PositionalError,
    /// A partner body was queried beyond its resolved window.
    StaleWindow,
}

impl ContactEvent {
    /// Creates a new event stamped with `sim_time`.
    pub fn new(sim_time: f64, kind: EventKind) -> Self {
        Self { sim_time, kind }
    }
}
