//! CLI command implementations.
//!
//! `simulate` embeds a minimal fixed-step host harness: it drives the
//! contact effector the way a host integrator would — write state
//! messages, `update`, query each dynamic body — and reacts to the
//! sentinel by retrying the step with a halved `dt`, which is exactly the
//! adaptive-integrator behavior the sentinel is designed to provoke.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use regolith_body::{EphemerisMsg, MassPropsMsg, SharedBuffer, StateMsg};
use regolith_io::{
    validate_scenario, BodyRole, FinalBodyState, ScenarioInput, ScenarioMetrics, ScenarioOutput,
};
use regolith_math::{Mat3, Quat, Vec3};
use regolith_mesh::build_clusters;
use regolith_solver::{ContactConfig, ContactEffector};
use regolith_telemetry::{ContactEvent, EventKind, EventSink};
use regolith_types::constants::DEFAULT_MIN_BOUNDING_BOX_DIM;
use regolith_types::{RegolithError, RegolithResult};

/// Maximum step halvings before a rejected step is skipped outright.
const MAX_STEP_HALVINGS: u32 = 6;

/// Telemetry sink counting sentinel emissions.
struct SentinelCounter(Arc<AtomicU32>);

impl EventSink for SentinelCounter {
    fn handle(&mut self, event: &ContactEvent) {
        if matches!(event.kind, EventKind::Sentinel { .. }) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn name(&self) -> &str {
        "sentinel_counter"
    }
}

/// Host-side mirror of one scenario body.
struct HostBody {
    tag: String,
    dynamic: Option<DynamicProps>,
    position: Vec3,
    velocity: Vec3,
    attitude: Quat,
    omega_b: Vec3,
    state_buf: Option<SharedBuffer<StateMsg>>,
    ephemeris_buf: Option<SharedBuffer<EphemerisMsg>>,
}

struct DynamicProps {
    mass: f64,
    inertia_b_inv: Mat3,
}

impl HostBody {
    fn publish(&self) {
        if let Some(buf) = &self.state_buf {
            buf.write(StateMsg {
                position: self.position,
                velocity: self.velocity,
                attitude: self.attitude,
                omega_b: self.omega_b,
                omega_dot_b: Vec3::ZERO,
                accel_nc_b: Vec3::ZERO,
            });
        }
        if let Some(buf) = &self.ephemeris_buf {
            buf.write(EphemerisMsg {
                position: self.position,
                velocity: self.velocity,
                attitude: self.attitude,
                omega_b: self.omega_b,
            });
        }
    }

    /// Semi-implicit Euler step under the given load.
    fn advance(&mut self, load: regolith_solver::BodyLoad, dt: f64) {
        if let Some(props) = &self.dynamic {
            self.velocity += load.force_n * dt / props.mass;
            self.omega_b += props.inertia_b_inv * (load.torque_b * dt);
        }
        self.position += self.velocity * dt;
        let omega_quat = Quat::from_xyzw(self.omega_b.x, self.omega_b.y, self.omega_b.z, 0.0);
        self.attitude = (self.attitude + (self.attitude * omega_quat) * (0.5 * dt)).normalize();
    }
}

fn load_scenario(path: &str) -> RegolithResult<ScenarioInput> {
    let text = std::fs::read_to_string(path)?;
    let scenario: ScenarioInput =
        serde_json::from_str(&text).map_err(|e| RegolithError::Serialization(e.to_string()))?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

/// Runs a scenario and writes the result as JSON.
pub fn simulate(scenario_path: &str, output: Option<&str>) -> RegolithResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let result = run_scenario(&scenario)?;

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| RegolithError::Serialization(e.to_string()))?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn run_scenario(scenario: &ScenarioInput) -> RegolithResult<ScenarioOutput> {
    let params = &scenario.params;
    let config = ContactConfig {
        max_bounding_box_dim: params.max_bounding_box_dim,
        max_pos_error: params.max_pos_error,
        collision_integration_step: params.collision_integration_step,
        max_time_step: params.dt,
        ..Default::default()
    };
    let mut effector = ContactEffector::new(config)?;

    let sentinel_count = Arc::new(AtomicU32::new(0));
    effector
        .telemetry_mut()
        .add_sink(Box::new(SentinelCounter(Arc::clone(&sentinel_count))));

    // Register bodies and keep host-side mirrors of their states.
    let mut hosts: Vec<HostBody> = Vec::with_capacity(scenario.bodies.len());
    for spec in &scenario.bodies {
        let contact_params = regolith_body::ContactParams {
            bounding_radius: spec.bounding_radius,
            restitution: spec.restitution,
            friction: spec.friction,
        };
        let mut host = HostBody {
            tag: spec.tag.clone(),
            dynamic: None,
            position: spec.initial.position,
            velocity: spec.initial.velocity,
            attitude: spec.initial.attitude.normalize(),
            omega_b: spec.initial.omega_b,
            state_buf: None,
            ephemeris_buf: None,
        };
        match &spec.role {
            BodyRole::Dynamic { mass, inertia_diag } => {
                let inertia = Mat3::from_diagonal(Vec3::from_array(*inertia_diag));
                let state_buf = SharedBuffer::new(StateMsg {
                    position: host.position,
                    velocity: host.velocity,
                    attitude: host.attitude,
                    omega_b: host.omega_b,
                    omega_dot_b: Vec3::ZERO,
                    accel_nc_b: Vec3::ZERO,
                });
                let mass_buf = SharedBuffer::new(MassPropsMsg {
                    mass: *mass,
                    inertia_b: inertia,
                });
                effector.add_dynamic_body(
                    &spec.mesh,
                    &spec.tag,
                    Box::new(state_buf.clone()),
                    Box::new(mass_buf),
                    contact_params,
                )?;
                host.dynamic = Some(DynamicProps {
                    mass: *mass,
                    inertia_b_inv: inertia.inverse(),
                });
                host.state_buf = Some(state_buf);
            }
            BodyRole::Kinematic => {
                let buf = SharedBuffer::new(EphemerisMsg {
                    position: host.position,
                    velocity: host.velocity,
                    attitude: host.attitude,
                    omega_b: host.omega_b,
                });
                effector.add_kinematic_body(
                    &spec.mesh,
                    &spec.tag,
                    Box::new(buf.clone()),
                    contact_params,
                )?;
                host.ephemeris_buf = Some(buf);
            }
        }
        hosts.push(host);
    }

    let started = Instant::now();
    let mut metrics = ScenarioMetrics::default();
    let mut time = 0.0_f64;

    while time < params.duration {
        let mut dt_try = params.dt.min(params.duration - time);
        let mut halvings = 0;

        loop {
            for host in &hosts {
                host.publish();
            }
            effector.update((time * 1.0e9).round() as u64)?;

            let before = sentinel_count.load(Ordering::Relaxed);
            let loads: Vec<(usize, regolith_solver::BodyLoad)> = hosts
                .iter()
                .enumerate()
                .filter(|(_, h)| h.dynamic.is_some())
                .map(|(i, _)| (i, effector.compute_force_torque(time, dt_try)))
                .collect();
            let rejected = sentinel_count.load(Ordering::Relaxed) > before;

            if rejected && halvings < MAX_STEP_HALVINGS {
                metrics.sentinel_rejections += 1;
                dt_try /= 2.0;
                halvings += 1;
                continue;
            }

            let mut impact = false;
            for (i, load) in &loads {
                if !rejected {
                    if load.force_n.length() > 0.0 {
                        impact = true;
                    }
                    hosts[*i].advance(*load, dt_try);
                } else {
                    // Step stayed rejected at the smallest dt; coast.
                    let zero = regolith_solver::BodyLoad::ZERO;
                    hosts[*i].advance(zero, dt_try);
                }
            }
            for host in hosts.iter_mut().filter(|h| h.dynamic.is_none()) {
                host.position += host.velocity * dt_try;
            }

            metrics.step_count += 1;
            if impact {
                metrics.impact_steps += 1;
            }
            time += dt_try;
            break;
        }
    }

    metrics.wall_time_seconds = started.elapsed().as_secs_f64();

    let final_states = hosts
        .iter()
        .map(|h| FinalBodyState {
            tag: h.tag.clone(),
            position: h.position,
            velocity: h.velocity,
            omega_b: h.omega_b,
        })
        .collect();

    Ok(ScenarioOutput {
        final_states,
        metrics,
    })
}

/// Validates a scenario file and reports its preprocessed geometry.
pub fn validate(path: &str) -> RegolithResult<()> {
    let scenario = load_scenario(path)?;

    for body in &scenario.bodies {
        let clusters = build_clusters(
            &body.mesh,
            scenario.params.max_bounding_box_dim,
            DEFAULT_MIN_BOUNDING_BOX_DIM,
        )?;
        let edges: usize = clusters.iter().map(|c| c.edges.len()).sum();
        println!(
            "{}: {} vertices, {} triangles, {} clusters, {} unique edges",
            body.tag,
            body.mesh.vertex_count(),
            body.mesh.triangle_count(),
            clusters.len(),
            edges
        );
    }
    println!("Scenario OK ({} bodies)", scenario.bodies.len());
    Ok(())
}
