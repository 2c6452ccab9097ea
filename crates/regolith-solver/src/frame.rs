//! Contact-frame construction.
//!
//! Each contact gets an orthonormal frame with the third axis along the
//! contact normal; impulses and relative velocities live in these
//! coordinates inside the solver.

use regolith_math::{Mat3, Vec3};

/// Builds the rotation from the inertial frame into the contact frame.
///
/// The third axis is the unit contact normal. The first axis is the normal
/// crossed with the supporting body's z-axis (expressed in the inertial
/// frame), falling back to the x-axis when the normal is near-parallel to
/// z. The rows of the returned matrix are the frame axes.
pub fn world_to_contact(normal: Vec3, support_rot: Mat3) -> Mat3 {
    let c3 = normal.normalize();
    let mut c1 = c3.cross(support_rot * Vec3::Z);
    if c1.length() < 1e-9 {
        c1 = c3.cross(support_rot * Vec3::X);
    }
    let c1 = c1.normalize();
    let c2 = c3.cross(c1).normalize();

    Mat3::from_cols(c1, c2, c3).transpose()
}

/// Skew-symmetric cross-product matrix `[v]x` such that `[v]x w = v x w`.
#[inline]
pub fn tilde(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}
