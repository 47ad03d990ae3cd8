//! Error types for surface extraction.

use thiserror::Error;

/// Result type for surface extraction.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors that can occur while extracting a surface from a point cloud.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The point cloud has no points.
    #[error("point cloud is empty")]
    EmptyPointCloud,

    /// Too few points for a surface.
    #[error("insufficient points: need at least {required}, have {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Number of points provided.
        actual: usize,
    },

    /// The extraction produced nothing usable.
    #[error("surface extraction failed: {reason}")]
    ExtractionFailed {
        /// Description of the failure.
        reason: String,
    },
}
