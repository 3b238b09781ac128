//! Error types for hairguide.
//!
//! Boundary operations (mesh construction, curve creation, file IO)
//! return `HairResult<T>`. The physics step never does; it repairs or
//! discards bad data and reports what it did.

use thiserror::Error;

/// Unified error type for hairguide.
#[derive(Debug, Error)]
pub enum HairError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A curve could not be created or restored.
    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    /// A root binding references a triangle that does not exist.
    #[error("Invalid binding: triangle {triangle} (mesh has {triangle_count} triangles)")]
    InvalidBinding {
        triangle: i64,
        triangle_count: usize,
    },

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A text format (PLY) could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A solver backend could not be created or used.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Convenience alias for `Result<T, HairError>`.
pub type HairResult<T> = Result<T, HairError>;
