//! Contact record data types.
//!
//! A `Contact` pins down one touching primitive pair: the contact point on
//! each body, the unit contact normal, and how far apart the primitives
//! were at the sampled instant. The `ContactSet` accumulator applies the
//! acceptance and deduplication rules while the narrow phase inserts.

use serde::{Deserialize, Serialize};

use regolith_math::Vec3;
use regolith_types::constants::CONTACT_DEDUP_RADIUS;

/// Which primitive pair produced a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Vertex of one body against a triangle of the other.
    VertexFace,
    /// Edge of body 1 against edge of body 2.
    EdgeEdge,
}

/// A detected contact between two bodies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Contact {
    /// Contact kind.
    pub kind: ContactKind,
    /// Contact point on body 1, world frame.
    pub point_a: Vec3,
    /// Contact point on body 2, world frame.
    pub point_b: Vec3,
    /// Unit normal along the impulsive force applied to body 1.
    pub normal: Vec3,
    /// Minimum separation between the primitives at the sampled instant.
    pub pos_error: f64,
}

/// Accumulates contacts for one narrow-phase invocation.
///
/// Tracks the best (minimum) and worst (maximum) positional errors and
/// drops near-duplicate contacts: adjacent triangles share vertices and
/// edges, so the same touch shows up through several primitive pairs.
#[derive(Debug, Clone)]
pub struct ContactSet {
    contacts: Vec<Contact>,
    max_error: f64,
    min_error: f64,
}

impl ContactSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            max_error: 0.0,
            min_error: f64::INFINITY,
        }
    }

    /// Acceptance rule: a contact is kept when its error clears the
    /// configured threshold, or when it is no worse than the best error
    /// found so far (so a tightening pass never discards the closest pair).
    pub fn accepts(&self, pos_error: f64, max_pos_error: f64) -> bool {
        pos_error <= max_pos_error || pos_error <= self.min_error + 1e-15
    }

    /// Inserts a contact, dropping any existing contact that shares either
    /// contact point within a millimeter.
    pub fn insert(&mut self, contact: Contact) {
        self.contacts.retain(|c| {
            (c.point_a - contact.point_a).length() >= CONTACT_DEDUP_RADIUS
                && (c.point_b - contact.point_b).length() >= CONTACT_DEDUP_RADIUS
        });
        self.contacts.push(contact);

        self.max_error = 0.0;
        self.min_error = f64::INFINITY;
        for c in &self.contacts {
            self.max_error = self.max_error.max(c.pos_error);
            self.min_error = self.min_error.min(c.pos_error);
        }
    }

    /// The accepted contacts.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Largest positional error across accepted contacts.
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Smallest positional error across accepted contacts.
    pub fn min_error(&self) -> f64 {
        self.min_error
    }

    /// Number of accepted contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns true when no contacts were accepted.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl Default for ContactSet {
    fn default() -> Self {
        Self::new()
    }
}
