//! Error types for mesh export.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a mesh.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh has no faces to write.
    #[error("mesh is empty")]
    EmptyMesh,
}
