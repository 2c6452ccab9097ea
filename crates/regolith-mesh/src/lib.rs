//! # regolith-mesh
//!
//! Triangle-mesh ingestion and preprocessing for the Regolith contact engine.
//!
//! Bodies arrive as vertex and triangle-index arrays (organized into shape
//! groups); this crate validates them and compiles them once, at
//! registration, into spatially-coherent face *clusters* with a half-edge
//! adjacency model:
//! 1. Per-triangle normals, centroids, and bounding extents
//! 2. Shared-edge face adjacency
//! 3. Furthest-first cluster growth bounded by a maximum cluster dimension
//! 4. Per-cluster oriented-bounding-box geometry
//! 5. Body-wide edge pairing and unique-vertex assignment
//!
//! Clusters are the unit of broad-phase culling; their edges and unique
//! vertices are the primitives the narrow phase tests.

pub mod cluster;
pub mod generators;
pub mod mesh;

pub use cluster::{build_clusters, Cluster, ClusterEdge, Face};
pub use mesh::{ContactMesh, ShapeGroup};
