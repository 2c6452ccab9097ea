//! Error types for the Regolith engine.
//!
//! All crates return `RegolithResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Regolith engine.
#[derive(Debug, Error)]
pub enum RegolithError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Body registration data is out of valid range.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The impulse integrator hit its iteration cap before every contact
    /// completed restitution. The partial impulse is still usable.
    #[error("Impulse integration hit the iteration cap ({iterations}); partial impulse accepted")]
    SolverCap {
        iterations: u64,
    },
}

/// Convenience alias for `Result<T, RegolithError>`.
pub type RegolithResult<T> = Result<T, RegolithError>;
