//! # regolith-telemetry
//!
//! Event bus for contact-engine telemetry. Emits structured events
//! (broad-phase admissions, narrow-phase contacts, impulse-solver
//! convergence, sentinel emissions) that can be consumed by pluggable
//! sinks (test buffers, `tracing` logs, external streams).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{ContactEvent, EventKind};
pub use sinks::{EventSink, TracingSink, VecSink};
