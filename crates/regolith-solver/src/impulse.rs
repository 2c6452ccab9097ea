//! Reduced-coordinate multi-point impulse integration.
//!
//! For k simultaneous contacts the solve state is a length-8k vector: per
//! contact a contact-frame relative velocity `v_C`, an accumulated impulse
//! `P_C`, and the normal work done during compression and restitution
//! `(W_n, W_r)`. The contact-frame inverse-mass matrix maps impulse rates
//! to relative-velocity rates; RK4 integrates the system until Stronge's
//! energetic condition `W_r >= -e^2 W_n` holds at every contact.
//!
//! The integration variable is the normal impulse itself, not time: the
//! normal impulse rate is 1 while a contact is active, friction opposes the
//! instantaneous slip direction at rate `mu`, and work accumulates as
//! `v_z dP`.

use regolith_body::{KinematicState, MassProps};
use regolith_contact::Contact;
use regolith_math::{BlockMat3, Mat3, Vec3};
use regolith_types::constants::RESTITUTION_WORK_SEED;

use crate::frame::{tilde, world_to_contact};

/// Coefficients and integration controls for one impulse solve.
#[derive(Debug, Clone, Copy)]
pub struct SolveParams {
    /// Coefficient of restitution for the pair.
    pub restitution: f64,
    /// Coefficient of friction for the pair.
    pub friction: f64,
    /// RK4 step size (impulse units).
    pub integration_step: f64,
    /// Tangential speed below which friction is left out.
    pub slip_tolerance: f64,
    /// Hard cap on RK4 iterations.
    pub max_iterations: u64,
}

/// Result of one impulse solve.
#[derive(Debug, Clone)]
pub struct ImpulseOutcome {
    /// Force on body 1, inertial frame.
    pub force_b1_n: Vec3,
    /// Torque on body 1 about its body origin, body frame.
    pub torque_b1_b: Vec3,
    /// Force on body 2, inertial frame.
    pub force_b2_n: Vec3,
    /// Torque on body 2 about its body origin, body frame.
    pub torque_b2_b: Vec3,
    /// Accumulated per-contact impulses in each contact's local frame.
    pub impulses_c: Vec<Vec3>,
    /// Accumulated per-contact impulses in the inertial frame.
    pub impulses_n: Vec<Vec3>,
    /// RK4 iterations used.
    pub iterations: u64,
    /// True when the iteration cap cut the integration short; the partial
    /// impulse is still reported.
    pub capped: bool,
}

impl ImpulseOutcome {
    fn empty() -> Self {
        Self {
            force_b1_n: Vec3::ZERO,
            torque_b1_b: Vec3::ZERO,
            force_b2_n: Vec3::ZERO,
            torque_b2_b: Vec3::ZERO,
            impulses_c: Vec::new(),
            impulses_n: Vec::new(),
            iterations: 0,
            capped: false,
        }
    }
}

/// Derivative of the collision state under Stronge's energetic law.
fn collision_state_derivative(
    x: &[f64],
    m_tot: &BlockMat3,
    restitution: f64,
    friction: f64,
    slip_tolerance: f64,
) -> Vec<f64> {
    let k = m_tot.blocks();
    let e_sq = restitution * restitution;
    let mut xdot = vec![0.0; x.len()];

    for i in 0..k {
        let w_n = x[6 * k + 2 * i];
        let w_r = x[6 * k + 2 * i + 1];
        let active = w_r < -e_sq * w_n;

        if active {
            if friction > 0.0 {
                let vx = x[3 * i];
                let vy = x[3 * i + 1];
                if (vx * vx + vy * vy).sqrt() > slip_tolerance {
                    let phi = vy.atan2(vx);
                    xdot[3 * k + 3 * i] = -friction * phi.cos();
                    xdot[3 * k + 3 * i + 1] = -friction * phi.sin();
                }
            }
            xdot[3 * k + 3 * i + 2] = 1.0;
        }

        let vz = x[3 * i + 2];
        if vz < 0.0 {
            xdot[6 * k + 2 * i] = vz;
        } else if active {
            xdot[6 * k + 2 * i + 1] = vz;
        }
    }

    let dv = m_tot.mul_vec(&xdot[3 * k..6 * k]);
    xdot[..3 * k].copy_from_slice(&dv);
    xdot
}

fn euler_trial(x: &[f64], xdot: &[f64], h: f64) -> Vec<f64> {
    x.iter().zip(xdot).map(|(a, d)| a + h * d).collect()
}

/// Resolves a set of simultaneous contacts into a force and torque on each
/// body.
///
/// `mass1`/`mass2` are `None` for kinematic bodies, whose inverse-mass
/// terms are omitted (infinite mass). With both absent there is nothing to
/// solve and the outcome is zero. `dt` is the host step the impulse is
/// spread across.
pub fn resolve_impacts(
    contacts: &[Contact],
    state1: &KinematicState,
    mass1: Option<&MassProps>,
    state2: &KinematicState,
    mass2: Option<&MassProps>,
    params: &SolveParams,
    dt: f64,
) -> ImpulseOutcome {
    let k = contacts.len();
    if k == 0 || (mass1.is_none() && mass2.is_none()) {
        return ImpulseOutcome::empty();
    }

    let r_nb1 = state1.rot_body_to_world();
    let r_nb2 = state2.rot_body_to_world();

    // Contact frames; the first axis is seeded from the supporting body's
    // z-axis (body 2 carries the reference direction).
    let dcm_cn: Vec<Mat3> = contacts
        .iter()
        .map(|c| world_to_contact(c.normal, r_nb2))
        .collect();
    let dcm_cb1: Vec<Mat3> = dcm_cn.iter().map(|cn| *cn * r_nb1).collect();
    let dcm_cb2: Vec<Mat3> = dcm_cn.iter().map(|cn| *cn * r_nb2).collect();

    // Contact-frame inverse-mass matrix. Block (i, j) maps the impulse at
    // contact j to the relative-velocity change at contact i; lever arms
    // run from each body's origin to the contact points.
    let mut m_tot = BlockMat3::zeros(k);
    for i in 0..k {
        for j in 0..k {
            let mut block = Mat3::ZERO;
            if let Some(m1) = mass1 {
                let lever_i = dcm_cn[i] * (contacts[i].point_a - state1.position);
                let lever_j = dcm_cn[i] * (contacts[j].point_a - state1.position);
                let inv_inertia = dcm_cb1[i] * m1.inertia_b_inv * dcm_cb1[i].transpose();
                block = block + Mat3::IDENTITY * (1.0 / m1.mass)
                    - tilde(lever_i) * inv_inertia * tilde(lever_j);
            }
            if let Some(m2) = mass2 {
                let lever_i = dcm_cn[i] * (contacts[i].point_b - state2.position);
                let lever_j = dcm_cn[i] * (contacts[j].point_b - state2.position);
                let inv_inertia = dcm_cb2[i] * m2.inertia_b_inv * dcm_cb2[i].transpose();
                block = block + Mat3::IDENTITY * (1.0 / m2.mass)
                    - tilde(lever_i) * inv_inertia * tilde(lever_j);
            }
            if i != j {
                // Rotate impulses from contact frame j into frame i.
                block = block * (dcm_cb1[i] * dcm_cb1[j].transpose());
            }
            m_tot.set_block(i, j, block);
        }
    }

    // Initial collision state: relative contact-point velocities in each
    // contact frame, zero impulse, and a seed on the restitution work for
    // numerical robustness at the regime boundary.
    let mut x = vec![0.0; 8 * k];
    for (i, contact) in contacts.iter().enumerate() {
        let v_rel =
            state1.surface_velocity(contact.point_a) - state2.surface_velocity(contact.point_b);
        let v_c = dcm_cn[i] * v_rel;
        x[3 * i] = v_c.x;
        x[3 * i + 1] = v_c.y;
        x[3 * i + 2] = v_c.z;
        x[6 * k + 2 * i + 1] = if v_c.z < 0.0 {
            -RESTITUTION_WORK_SEED
        } else {
            RESTITUTION_WORK_SEED
        };
    }

    // Integrate until every contact satisfies the energetic termination
    // condition. The predicate is checked after each full RK4 step, so the
    // integration may run one step past the exact boundary.
    let h = params.integration_step;
    let e_sq = params.restitution * params.restitution;
    let mut iterations = 0u64;
    let mut capped = false;
    loop {
        let k1 = collision_state_derivative(
            &x,
            &m_tot,
            params.restitution,
            params.friction,
            params.slip_tolerance,
        );
        let k2 = collision_state_derivative(
            &euler_trial(&x, &k1, h / 2.0),
            &m_tot,
            params.restitution,
            params.friction,
            params.slip_tolerance,
        );
        let k3 = collision_state_derivative(
            &euler_trial(&x, &k2, h / 2.0),
            &m_tot,
            params.restitution,
            params.friction,
            params.slip_tolerance,
        );
        let k4 = collision_state_derivative(
            &euler_trial(&x, &k3, h),
            &m_tot,
            params.restitution,
            params.friction,
            params.slip_tolerance,
        );
        for idx in 0..x.len() {
            x[idx] += (h / 6.0) * (k1[idx] + 2.0 * k2[idx] + 2.0 * k3[idx] + k4[idx]);
        }
        iterations += 1;

        let energy_met =
            (0..k).all(|i| x[6 * k + 2 * i + 1] >= -e_sq * x[6 * k + 2 * i]);
        if energy_met {
            break;
        }
        if iterations >= params.max_iterations {
            let err = regolith_types::RegolithError::SolverCap { iterations };
            tracing::warn!(contacts = k, "{err}");
            capped = true;
            break;
        }
    }

    // Rotate accumulated impulses back to the inertial frame and spread
    // them across the host step.
    let inv_dt = 1.0 / dt;
    let r_bn1 = r_nb1.transpose();
    let r_bn2 = r_nb2.transpose();
    let mut outcome = ImpulseOutcome {
        iterations,
        capped,
        ..ImpulseOutcome::empty()
    };
    for i in 0..k {
        let p_c = Vec3::new(x[3 * k + 3 * i], x[3 * k + 3 * i + 1], x[3 * k + 3 * i + 2]);
        let j_n = dcm_cn[i].transpose() * p_c;
        outcome.impulses_c.push(p_c);
        outcome.impulses_n.push(j_n);

        outcome.force_b1_n += j_n * inv_dt;
        outcome.torque_b1_b +=
            r_bn1 * (contacts[i].point_a - state1.position).cross(j_n * inv_dt);
        outcome.force_b2_n -= j_n * inv_dt;
        outcome.torque_b2_b -=
            r_bn2 * (contacts[i].point_b - state2.position).cross(j_n * inv_dt);
    }
    outcome
}
