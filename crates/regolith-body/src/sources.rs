//! Message sources — the narrow interface to the host's message bus.
//!
//! The host simulator delivers body states over its own transport; Regolith
//! only requires something it can poll once per cycle. Each source trait
//! mirrors one message payload. [`SharedBuffer`] is the in-process
//! implementation used by the CLI harness and tests; hosts with a real bus
//! implement the traits over their subscriber handles.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use regolith_math::{Mat3, Quat, Vec3};

/// State message of a dynamic body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StateMsg {
    /// Position of the body origin in the inertial frame.
    pub position: Vec3,
    /// Velocity in the inertial frame.
    pub velocity: Vec3,
    /// Unit rotation from body frame to inertial frame.
    pub attitude: Quat,
    /// Angular velocity in the body frame.
    pub omega_b: Vec3,
    /// Angular acceleration in the body frame.
    pub omega_dot_b: Vec3,
    /// Non-conservative linear acceleration in the body frame.
    pub accel_nc_b: Vec3,
}

/// Mass-properties message of a dynamic body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassPropsMsg {
    /// Body mass (kg).
    pub mass: f64,
    /// Inertia tensor about the body origin, body frame (kg m^2).
    pub inertia_b: Mat3,
}

/// Ephemeris message of a kinematic body (externally imposed trajectory).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EphemerisMsg {
    /// Position of the body origin in the inertial frame.
    pub position: Vec3,
    /// Velocity in the inertial frame.
    pub velocity: Vec3,
    /// Unit rotation from body frame to inertial frame.
    pub attitude: Quat,
    /// Angular velocity in the body frame.
    pub omega_b: Vec3,
}

/// Source of dynamic-body state messages.
pub trait StateSource: Send {
    /// Returns the most recent state message.
    fn read(&self) -> StateMsg;
}

/// Source of dynamic-body mass-properties messages.
pub trait MassPropsSource: Send {
    /// Returns the most recent mass-properties message.
    fn read(&self) -> MassPropsMsg;
}

/// Source of kinematic-body ephemeris messages.
pub trait EphemerisSource: Send {
    /// Returns the most recent ephemeris message.
    fn read(&self) -> EphemerisMsg;
}

/// Shared in-process message buffer.
///
/// The writer half (host) and reader half (registry) hold clones of the
/// same buffer; `write` replaces the payload, `read` copies it out.
#[derive(Debug)]
pub struct SharedBuffer<T: Copy>(Arc<Mutex<T>>);

impl<T: Copy> SharedBuffer<T> {
    /// Creates a buffer holding `initial`.
    pub fn new(initial: T) -> Self {
        Self(Arc::new(Mutex::new(initial)))
    }

    /// Replaces the buffered payload.
    pub fn write(&self, value: T) {
        *self.lock() = value;
    }

    /// Copies the buffered payload out.
    pub fn read_buffer(&self) -> T {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        match self.0.lock() {
            Ok(guard) => guard,
            // A writer panicking mid-store cannot tear a Copy payload.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Copy> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl StateSource for SharedBuffer<StateMsg> {
    fn read(&self) -> StateMsg {
        self.read_buffer()
    }
}

impl MassPropsSource for SharedBuffer<MassPropsMsg> {
    fn read(&self) -> MassPropsMsg {
        self.read_buffer()
    }
}

impl EphemerisSource for SharedBuffer<EphemerisMsg> {
    fn read(&self) -> EphemerisMsg {
        self.read_buffer()
    }
}
