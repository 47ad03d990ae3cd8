//! Error types for structure construction and export.

use thiserror::Error;

/// Result type for structure operations.
pub type StructureResult<T> = Result<T, StructureError>;

/// Errors that can occur while building or exporting a structure.
///
/// Per-item problems in the input (dangling links, excluded sections,
/// malformed records) are not errors; they are dropped with a log line.
/// These variants cover failures of the envelope itself.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The annotation payload is not valid JSON.
    #[error("failed to decode annotation payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Export of the cached mesh failed.
    #[error("mesh export failed: {0}")]
    Export(#[from] skel_io::ExportError),
}
