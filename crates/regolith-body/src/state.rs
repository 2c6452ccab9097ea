//! Kinematic state of a body and its linear-in-time extrapolation.
//!
//! The broad and narrow phases sweep geometry across one host integration
//! step; both endpoints of the sweep come from here. Frames follow the
//! usual convention: positions and velocities in the inertial frame,
//! angular rates and accelerations in the body frame.

use serde::{Deserialize, Serialize};

use regolith_math::{Mat3, Quat, Vec3};

/// Kinematic state of one body at an instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KinematicState {
    /// Position of the body origin in the inertial frame.
    pub position: Vec3,
    /// Velocity of the body origin in the inertial frame.
    pub velocity: Vec3,
    /// Unit rotation taking body-frame vectors into the inertial frame.
    pub attitude: Quat,
    /// Angular velocity in the body frame.
    pub omega_b: Vec3,
    /// Angular acceleration in the body frame.
    pub omega_dot_b: Vec3,
    /// Non-conservative linear acceleration in the body frame.
    pub accel_nc_b: Vec3,
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            attitude: Quat::IDENTITY,
            omega_b: Vec3::ZERO,
            omega_dot_b: Vec3::ZERO,
            accel_nc_b: Vec3::ZERO,
        }
    }
}

impl KinematicState {
    /// Rotation matrix from body frame to inertial frame.
    #[inline]
    pub fn rot_body_to_world(&self) -> Mat3 {
        Mat3::from_quat(self.attitude)
    }

    /// Maps a body-frame point into the inertial frame.
    #[inline]
    pub fn to_world(&self, point_b: Vec3) -> Vec3 {
        self.position + self.attitude * point_b
    }

    /// Velocity of the body surface at a world-frame point:
    /// `v + R_NB (omega x r_b)` with `r_b` the body-frame lever arm.
    pub fn surface_velocity(&self, point_world: Vec3) -> Vec3 {
        let lever_b = self.attitude.inverse() * (point_world - self.position);
        self.velocity + self.attitude * self.omega_b.cross(lever_b)
    }

    /// Extrapolates the state linearly across `dt`.
    ///
    /// Position picks up the non-conservative acceleration term, angular
    /// velocity its derivative, and the attitude is integrated by the
    /// quaternion kinematic relation and renormalized. Kinematic bodies
    /// carry zero `omega_dot_b`/`accel_nc_b`, which reduces this to the
    /// externally-imposed straight-line sweep.
    pub fn extrapolate(&self, dt: f64) -> KinematicState {
        let position =
            self.position + self.velocity * dt + self.attitude * (self.accel_nc_b * dt * dt);
        let velocity = self.velocity + self.attitude * (self.accel_nc_b * dt);
        let omega_b = self.omega_b + self.omega_dot_b * dt;

        // qdot = 0.5 * q (x) omega_b
        let omega_quat = Quat::from_xyzw(omega_b.x, omega_b.y, omega_b.z, 0.0);
        let qdot = (self.attitude * omega_quat) * 0.5;
        let attitude = (self.attitude + qdot * dt).normalize();

        KinematicState {
            position,
            velocity,
            attitude,
            omega_b,
            omega_dot_b: self.omega_dot_b,
            accel_nc_b: self.accel_nc_b,
        }
    }
}
