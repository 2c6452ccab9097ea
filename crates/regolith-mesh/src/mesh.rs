//! Core triangle mesh type.
//!
//! A `ContactMesh` is the raw registration input: body-frame vertex
//! positions plus triangle indices organized into shape groups. Mesh *file*
//! parsing happens upstream; whatever loader is used must already have
//! triangulated the surface.

use serde::{Deserialize, Serialize};

use regolith_math::Vec3;
use regolith_types::{RegolithError, RegolithResult};

/// One shape group: a named run of triangle indices over the shared
/// vertex array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeGroup {
    /// Group name (empty for anonymous groups).
    pub name: String,
    /// Triangle indices, stored flat: `[t0v0, t0v1, t0v2, t1v0, ...]`.
    pub indices: Vec<u32>,
}

/// A triangulated mesh in body frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMesh {
    /// Vertex positions in the body frame.
    pub vertices: Vec<Vec3>,
    /// Shape groups referencing into `vertices`.
    pub groups: Vec<ShapeGroup>,
}

impl ContactMesh {
    /// Creates a mesh from vertices and groups.
    pub fn new(vertices: Vec<Vec3>, groups: Vec<ShapeGroup>) -> Self {
        Self { vertices, groups }
    }

    /// Constructs a single-group mesh from interleaved position data
    /// `[x0, y0, z0, x1, y1, z1, ...]` and a flat index array.
    pub fn from_arrays(positions: &[f64], indices: &[u32]) -> RegolithResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(RegolithError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }
        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let mesh = Self {
            vertices,
            groups: vec![ShapeGroup {
                name: String::new(),
                indices: indices.to_vec(),
            }],
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the total number of triangles across all groups.
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.indices.len() / 3).sum()
    }

    /// Iterates over every triangle in every group, in declaration order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]))
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - Every group's index count is divisible by 3 (triangles only)
    /// - All indices are within bounds
    /// - At least one triangle exists
    pub fn validate(&self) -> RegolithResult<()> {
        let n = self.vertices.len();

        let mut total = 0;
        for (gi, group) in self.groups.iter().enumerate() {
            if group.indices.len() % 3 != 0 {
                return Err(RegolithError::InvalidMesh(format!(
                    "Group {} index count ({}) is not divisible by 3; non-triangular faces are disallowed",
                    gi,
                    group.indices.len()
                )));
            }
            for &idx in &group.indices {
                if idx as usize >= n {
                    return Err(RegolithError::InvalidMesh(format!(
                        "Group {} references vertex {} (vertex count: {})",
                        gi, idx, n
                    )));
                }
            }
            total += group.indices.len() / 3;
        }

        if total == 0 {
            return Err(RegolithError::InvalidMesh(
                "Mesh contains no triangles".into(),
            ));
        }

        Ok(())
    }
}
