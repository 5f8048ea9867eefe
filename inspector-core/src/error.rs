//! Error types for inspection operations.
//!
//! The engine itself never fails: lookups that miss return `None` and
//! degenerate geometry yields empty results. Errors only arise at the
//! edges, when decoding snapshot documents or reading settings files.

use thiserror::Error;

use crate::ElementId;

/// Result type for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;

/// Errors that can occur at the engine's I/O edges.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Snapshot or settings serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Two records in one scan share an id.
    #[error("Duplicate element id in scan: {0}")]
    DuplicateElementId(ElementId),

    /// A record carries a NaN or infinite edge.
    #[error("Invalid geometry for element {id}: {reason}")]
    InvalidGeometry {
        /// Offending element.
        id: ElementId,
        /// What was wrong with it.
        reason: String,
    },

    /// Snapshot document version is not understood.
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}
