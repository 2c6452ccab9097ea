//! Body registry: registration-time preprocessing and per-cycle ingestion.

use regolith_mesh::{build_clusters, ContactMesh};
use regolith_types::{BodyId, RegolithError, RegolithResult};

use crate::body::{Body, BodyKind, ContactParams, MassProps};
use crate::sources::{EphemerisSource, MassPropsSource, StateSource};
use crate::state::KinematicState;

/// Determinant magnitude below which an inertia tensor is rejected.
const SINGULAR_INERTIA_TOL: f64 = 1.0e-18;

enum Channel {
    Dynamic {
        state: Box<dyn StateSource>,
        mass: Box<dyn MassPropsSource>,
    },
    Kinematic {
        ephemeris: Box<dyn EphemerisSource>,
    },
}

struct Entry {
    body: Body,
    channel: Channel,
}

/// Owns every registered body and pulls their message sources each cycle.
pub struct BodyRegistry {
    entries: Vec<Entry>,
}

impl BodyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of registered bodies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no bodies are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared access to a body.
    pub fn body(&self, id: BodyId) -> &Body {
        &self.entries[id.index()].body
    }

    /// Iterates over all bodies in registration order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.entries.iter().map(|e| &e.body)
    }

    fn validate_params(params: &ContactParams) -> RegolithResult<()> {
        if params.bounding_radius <= 0.0 {
            return Err(RegolithError::InvalidBody(
                "Bounding radius must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&params.restitution) {
            return Err(RegolithError::InvalidBody(format!(
                "Coefficient of restitution must be in [0, 1], got {}",
                params.restitution
            )));
        }
        if params.friction < 0.0 {
            return Err(RegolithError::InvalidBody(
                "Coefficient of friction must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Registers a dynamic body.
    ///
    /// Builds the cluster preprocessing once, and reads the mass source once
    /// to fail fast on non-positive mass or a singular inertia tensor.
    #[allow(clippy::too_many_arguments)]
    pub fn add_dynamic(
        &mut self,
        mesh: &ContactMesh,
        tag: &str,
        state: Box<dyn StateSource>,
        mass: Box<dyn MassPropsSource>,
        params: ContactParams,
        max_bounding_box_dim: f64,
        min_bounding_box_dim: f64,
    ) -> RegolithResult<BodyId> {
        Self::validate_params(&params)?;
        let clusters = build_clusters(mesh, max_bounding_box_dim, min_bounding_box_dim)?;
        let props = Self::mass_props(&mass.read(), tag)?;

        let id = BodyId(self.entries.len() as u32);
        self.entries.push(Entry {
            body: Body {
                tag: tag.to_string(),
                kind: BodyKind::Dynamic,
                params,
                vertices: mesh.vertices.clone(),
                clusters,
                mass: Some(props),
                state: KinematicState::default(),
                end_state: KinematicState::default(),
            },
            channel: Channel::Dynamic { state, mass },
        });
        Ok(id)
    }

    /// Registers a kinematic body driven by an ephemeris source.
    pub fn add_kinematic(
        &mut self,
        mesh: &ContactMesh,
        tag: &str,
        ephemeris: Box<dyn EphemerisSource>,
        params: ContactParams,
        max_bounding_box_dim: f64,
        min_bounding_box_dim: f64,
    ) -> RegolithResult<BodyId> {
        Self::validate_params(&params)?;
        let clusters = build_clusters(mesh, max_bounding_box_dim, min_bounding_box_dim)?;

        let id = BodyId(self.entries.len() as u32);
        self.entries.push(Entry {
            body: Body {
                tag: tag.to_string(),
                kind: BodyKind::Kinematic,
                params,
                vertices: mesh.vertices.clone(),
                clusters,
                mass: None,
                state: KinematicState::default(),
                end_state: KinematicState::default(),
            },
            channel: Channel::Kinematic { ephemeris },
        });
        Ok(id)
    }

    fn mass_props(msg: &crate::sources::MassPropsMsg, tag: &str) -> RegolithResult<MassProps> {
        if msg.mass <= 0.0 {
            return Err(RegolithError::InvalidBody(format!(
                "Body '{}' has non-positive mass {}",
                tag, msg.mass
            )));
        }
        if msg.inertia_b.determinant().abs() < SINGULAR_INERTIA_TOL {
            return Err(RegolithError::InvalidBody(format!(
                "Body '{}' has a singular inertia tensor",
                tag
            )));
        }
        Ok(MassProps {
            mass: msg.mass,
            inertia_b: msg.inertia_b,
            inertia_b_inv: msg.inertia_b.inverse(),
        })
    }

    /// Pulls every message source, refreshes body states, and extrapolates
    /// each body to the end of the upcoming macro step of length `dt`.
    pub fn ingest(&mut self, dt: f64) -> RegolithResult<()> {
        if self.entries.is_empty() {
            return Err(RegolithError::InvalidConfig(
                "No bodies registered".into(),
            ));
        }
        for entry in &mut self.entries {
            match &entry.channel {
                Channel::Dynamic { state, mass } => {
                    let msg = state.read();
                    entry.body.state = KinematicState {
                        position: msg.position,
                        velocity: msg.velocity,
                        attitude: msg.attitude.normalize(),
                        omega_b: msg.omega_b,
                        omega_dot_b: msg.omega_dot_b,
                        accel_nc_b: msg.accel_nc_b,
                    };
                    entry.body.mass = Some(Self::mass_props(&mass.read(), &entry.body.tag)?);
                }
                Channel::Kinematic { ephemeris } => {
                    let msg = ephemeris.read();
                    entry.body.state = KinematicState {
                        position: msg.position,
                        velocity: msg.velocity,
                        attitude: msg.attitude.normalize(),
                        omega_b: msg.omega_b,
                        omega_dot_b: regolith_math::Vec3::ZERO,
                        accel_nc_b: regolith_math::Vec3::ZERO,
                    };
                }
            }
            entry.body.end_state = entry.body.state.extrapolate(dt);
        }
        Ok(())
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
