//! Cycle coordinator — the engine's face toward the host integrator.
//!
//! The host may call [`ContactEffector::compute_force_torque`] several
//! times per macro step (RK stages, adaptive retries), visiting each
//! dynamic body in turn. The coordinator runs broad + narrow + solve once
//! per body pair and caches the mutual result, so both participants see a
//! consistent impulse no matter how often they ask.
//!
//! Call protocol, inherited from the host's effector interface:
//! - `update(sim_time_ns)` once per macro step: ingest states, extrapolate,
//!   run the broad phase, reset caches.
//! - The first `compute_force_torque(t, dt)` call anchors the macro step
//!   and serves the first dynamic body; every later call repeating the
//!   anchor `(t, dt)` advances to the next dynamic body. Calls at other
//!   `(t, dt)` belong to the current body's visit.
//!
//! The coordinator is an explicit finite-state machine over
//! {Idle, Probing, Cached, Sentinel}, with transitions keyed on `(t, dt)`
//! equality within `time_synch_tol`.

use regolith_body::{BodyRegistry, ContactParams};
use regolith_contact::{broad_phase, detect_contacts, CandidatePair};
use regolith_math::Vec3;
use regolith_mesh::ContactMesh;
use regolith_telemetry::events::SentinelReason;
use regolith_telemetry::{ContactEvent, EventBus, EventKind};
use regolith_types::constants::NANO_TO_SEC;
use regolith_types::{BodyId, RegolithResult};

use crate::config::ContactConfig;
use crate::impulse::{resolve_impacts, SolveParams};
use crate::sentinel::SentinelRng;

/// Force and torque returned to the host for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyLoad {
    /// Force in the inertial frame.
    pub force_n: Vec3,
    /// Torque about the body origin, in the body frame.
    pub torque_b: Vec3,
}

impl BodyLoad {
    /// A zero load.
    pub const ZERO: Self = Self {
        force_n: Vec3::ZERO,
        torque_b: Vec3::ZERO,
    };
}

/// A resolved load cached for one body within the current window.
#[derive(Debug, Clone, Copy)]
struct CachedLoad {
    load: BodyLoad,
    resolved_time: f64,
    dt: f64,
    valid_until: f64,
}

/// Sentinel latch: once rejection is decided, every matching call in the
/// window gets a fresh random load.
#[derive(Debug, Clone, Copy)]
struct SentinelWindow {
    dt: f64,
    valid_until: f64,
}

/// Coordinator state across the repeated calls of one macro step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CyclePhase {
    /// No call seen since the last `update`.
    Idle,
    /// The active body's pair is being resolved.
    Probing { body: usize },
    /// A resolved load is cached for the active body.
    Cached { body: usize },
    /// The step-rejection sentinel is latched for the active body.
    Sentinel { body: usize },
}

/// The contact engine's cycle coordinator.
pub struct ContactEffector {
    config: ContactConfig,
    registry: BodyRegistry,
    pairs: Vec<CandidatePair>,
    phase: CyclePhase,
    anchor: Option<(f64, f64)>,
    cursor: Option<usize>,
    caches: Vec<Option<CachedLoad>>,
    sentinel_window: Option<SentinelWindow>,
    rng: SentinelRng,
    bus: EventBus,
    sim_time: f64,
}

impl ContactEffector {
    /// Creates a coordinator with the given configuration.
    pub fn new(config: ContactConfig) -> RegolithResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: BodyRegistry::new(),
            pairs: Vec::new(),
            phase: CyclePhase::Idle,
            anchor: None,
            cursor: None,
            caches: Vec::new(),
            sentinel_window: None,
            rng: SentinelRng::new(0x5EED_BA11),
            bus: EventBus::new(),
            sim_time: 0.0,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// The body registry (read-only).
    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    /// Telemetry bus, for registering sinks.
    pub fn telemetry_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Registers a dynamic body; see [`BodyRegistry::add_dynamic`].
    pub fn add_dynamic_body(
        &mut self,
        mesh: &ContactMesh,
        tag: &str,
        state: Box<dyn regolith_body::StateSource>,
        mass: Box<dyn regolith_body::MassPropsSource>,
        params: ContactParams,
    ) -> RegolithResult<BodyId> {
        let id = self.registry.add_dynamic(
            mesh,
            tag,
            state,
            mass,
            params,
            self.config.max_bounding_box_dim,
            self.config.min_bounding_box_dim,
        )?;
        self.caches.push(None);
        Ok(id)
    }

    /// Registers a kinematic body; see [`BodyRegistry::add_kinematic`].
    pub fn add_kinematic_body(
        &mut self,
        mesh: &ContactMesh,
        tag: &str,
        ephemeris: Box<dyn regolith_body::EphemerisSource>,
        params: ContactParams,
    ) -> RegolithResult<BodyId> {
        let id = self.registry.add_kinematic(
            mesh,
            tag,
            ephemeris,
            params,
            self.config.max_bounding_box_dim,
            self.config.min_bounding_box_dim,
        )?;
        self.caches.push(None);
        Ok(id)
    }

    /// Begins a new cycle: pulls all body state messages, extrapolates
    /// end-of-step kinematics, runs both broad-phase tiers, and resets the
    /// per-step caches.
    pub fn update(&mut self, sim_time_ns: u64) -> RegolithResult<()> {
        self.sim_time = sim_time_ns as f64 * NANO_TO_SEC;
        self.registry.ingest(self.config.max_time_step)?;
        self.pairs = broad_phase(&self.registry, self.config.bounding_box_ff);

        for cache in &mut self.caches {
            *cache = None;
        }
        self.phase = CyclePhase::Idle;
        self.anchor = None;
        self.cursor = None;
        self.sentinel_window = None;

        let cluster_overlaps: usize = self.pairs.iter().map(|p| p.overlaps.len()).sum();
        self.bus.emit(ContactEvent::new(
            self.sim_time,
            EventKind::BroadPhase {
                close_pairs: self.pairs.len() as u32,
                cluster_overlaps: cluster_overlaps as u32,
            },
        ));
        self.bus.flush();
        Ok(())
    }

    /// Advances the active-body cursor to the next dynamic body.
    fn advance_cursor(&mut self) {
        let n = self.registry.len();
        let mut next = self.cursor.map_or(0, |c| c + 1);
        while next < n && self.registry.body(BodyId(next as u32)).is_kinematic() {
            next += 1;
        }
        self.cursor = Some(next);
        self.phase = if next < n {
            CyclePhase::Probing { body: next }
        } else {
            CyclePhase::Idle
        };
    }

    /// Returns the force on the active body (inertial frame) and the torque
    /// about its origin (body frame) for the step `[current_time,
    /// current_time + dt]`.
    ///
    /// Callable multiple times per macro step with varying `dt`; repeated
    /// calls at the anchor `(t, dt)` advance the active-body cursor.
    pub fn compute_force_torque(&mut self, current_time: f64, dt: f64) -> BodyLoad {
        let tol = self.config.time_synch_tol;

        match self.anchor {
            None => {
                self.anchor = Some((current_time, dt));
                self.advance_cursor();
            }
            Some((t0, dt0)) if (current_time - t0).abs() < tol && (dt - dt0).abs() < tol => {
                self.advance_cursor();
            }
            _ => {}
        }

        let Some(body) = self.cursor.filter(|&b| b < self.registry.len()) else {
            return BodyLoad::ZERO;
        };

        match self.phase {
            CyclePhase::Cached { body: b } if b == body => {
                if let Some(cache) = self.caches[body] {
                    if (dt - cache.dt).abs() < tol && cache.valid_until >= current_time {
                        return cache.load;
                    }
                }
                self.phase = CyclePhase::Probing { body };
            }
            CyclePhase::Sentinel { body: b } if b == body => {
                if let Some(window) = self.sentinel_window {
                    if (dt - window.dt).abs() < tol && window.valid_until >= current_time {
                        let (force_n, torque_b) = self.rng.load(dt);
                        return BodyLoad { force_n, torque_b };
                    }
                }
                self.phase = CyclePhase::Probing { body };
            }
            _ => {}
        }

        self.probe(body, current_time, dt)
    }

    /// Resolves the active body's pair at `(current_time, dt)`.
    fn probe(&mut self, body: usize, current_time: f64, dt: f64) -> BodyLoad {
        let tol = self.config.time_synch_tol;

        // A partner share resolved earlier in this window is served as-is.
        if let Some(cache) = self.caches[body] {
            if (current_time - cache.resolved_time).abs() < tol && (dt - cache.dt).abs() < tol {
                self.phase = CyclePhase::Cached { body };
                return cache.load;
            }
            if current_time + dt > cache.valid_until {
                return self.latch_sentinel(body, current_time, dt, SentinelReason::StaleWindow);
            }
        }

        let Some(pair) = self
            .pairs
            .iter()
            .find(|p| p.first.index() == body || p.second.index() == body)
            .cloned()
        else {
            self.phase = CyclePhase::Probing { body };
            return BodyLoad::ZERO;
        };

        // Re-extrapolate both bodies from the ingested cycle state to this
        // call's instant, so every RK stage sees time-consistent geometry.
        let elapsed = current_time - self.sim_time;
        let (s1, s2, set, pair_params, mass1, mass2) = {
            let body1 = self.registry.body(pair.first);
            let body2 = self.registry.body(pair.second);
            let s1 = body1.state.extrapolate(elapsed);
            let e1 = s1.extrapolate(dt);
            let s2 = body2.state.extrapolate(elapsed);
            let e2 = s2.extrapolate(dt);
            let set = detect_contacts(
                body1,
                body2,
                &s1,
                &e1,
                &s2,
                &e2,
                &pair.overlaps,
                self.config.max_pos_error,
            );
            (s1, s2, set, body1.params, body1.mass, body2.mass)
        };
        self.bus.emit(ContactEvent::new(
            self.sim_time,
            EventKind::NarrowPhase {
                contact_count: set.len() as u32,
                max_pos_error: if set.is_empty() { 0.0 } else { set.max_error() },
            },
        ));

        if set.is_empty() {
            return self.latch_sentinel(body, current_time, dt, SentinelReason::NoContacts);
        }
        if set.max_error() > self.config.max_pos_error {
            return self.latch_sentinel(body, current_time, dt, SentinelReason::PositionalError);
        }

        // Restitution and friction come from the pair's first body; a
        // pair-indexed coefficient table replaces this once scenes carry
        // three or more interacting dynamic bodies.
        let solve = SolveParams {
            restitution: pair_params.restitution,
            friction: pair_params.friction,
            integration_step: self.config.collision_integration_step,
            slip_tolerance: self.config.slip_tolerance,
            max_iterations: self.config.max_solver_iterations,
        };
        let outcome = resolve_impacts(
            set.contacts(),
            &s1,
            mass1.as_ref(),
            &s2,
            mass2.as_ref(),
            &solve,
            dt,
        );
        self.bus.emit(ContactEvent::new(
            self.sim_time,
            EventKind::ImpulseSolve {
                contact_count: set.len() as u32,
                iterations: outcome.iterations,
                capped: outcome.capped,
            },
        ));
        self.bus.flush();

        let valid_until = current_time + dt + 1.0e-15;
        self.caches[pair.first.index()] = Some(CachedLoad {
            load: BodyLoad {
                force_n: outcome.force_b1_n,
                torque_b: outcome.torque_b1_b,
            },
            resolved_time: current_time,
            dt,
            valid_until,
        });
        self.caches[pair.second.index()] = Some(CachedLoad {
            load: BodyLoad {
                force_n: outcome.force_b2_n,
                torque_b: outcome.torque_b2_b,
            },
            resolved_time: current_time,
            dt,
            valid_until,
        });
        self.phase = CyclePhase::Cached { body };

        match self.caches[body] {
            Some(cache) => cache.load,
            None => BodyLoad::ZERO,
        }
    }

    /// Latches the sentinel for the rest of the window and returns the
    /// first random load.
    fn latch_sentinel(
        &mut self,
        body: usize,
        current_time: f64,
        dt: f64,
        reason: SentinelReason,
    ) -> BodyLoad {
        self.sentinel_window = Some(SentinelWindow {
            dt,
            valid_until: current_time + dt + 1.0e-15,
        });
        self.phase = CyclePhase::Sentinel { body };
        self.bus.emit(ContactEvent::new(
            self.sim_time,
            EventKind::Sentinel { reason },
        ));
        self.bus.flush();

        let (force_n, torque_b) = self.rng.load(dt);
        BodyLoad { force_n, torque_b }
    }
}
