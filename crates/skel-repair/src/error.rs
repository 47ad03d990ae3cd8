//! Error types for mesh repair operations.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors that can occur during mesh repair.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Mesh has no faces to operate on.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A boundary loop could not be triangulated.
    #[error("failed to fill hole: {reason}")]
    HoleFillFailed {
        /// Description of the failure.
        reason: String,
    },
}
