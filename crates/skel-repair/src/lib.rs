//! Mesh repair primitives for raw surface reconstructions.
//!
//! A surface extracted from a point cloud is rarely a clean 2-manifold:
//! it carries duplicated vertices, vertices where more than two sheets
//! meet, open boundary loops, and inconsistent winding. This crate
//! provides the individual repair passes; deciding which passes to run,
//! in what order, is the caller's job.
//!
//! - [`MeshAdjacency`] - edge-to-face adjacency with boundary and
//!   non-manifold queries
//! - [`weld_coincident_vertices`] / [`compact_vertices`] - vertex merge
//!   and compaction
//! - [`remove_non_manifold_vertices`] - single-pass non-manifold repair
//! - [`detect_boundary_loops`] / [`fill_all_holes`] - hole filling with
//!   no size limit
//! - [`normalize_winding`] - consistent, outward-facing orientation
//! - [`smooth_windowed_sinc`] - low-pass surface smoothing
//!
//! # Example
//!
//! ```
//! use skel_types::unit_cube;
//! use skel_repair::MeshAdjacency;
//!
//! let cube = unit_cube();
//! let adjacency = MeshAdjacency::build(&cube.faces);
//! assert!(adjacency.is_watertight());
//! assert!(adjacency.is_manifold());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod adjacency;
mod error;
mod holes;
mod manifold;
mod smooth;
mod weld;
mod winding;

pub use adjacency::MeshAdjacency;
pub use error::{RepairError, RepairResult};
pub use holes::{detect_boundary_loops, fill_all_holes, BoundaryLoop};
pub use manifold::{non_manifold_points, remove_non_manifold_vertices, NonManifoldRepair};
pub use smooth::{smooth_windowed_sinc, SmoothParams};
pub use weld::{compact_vertices, weld_coincident_vertices};
pub use winding::{count_inconsistent_edges, normalize_winding, WindingSummary};
