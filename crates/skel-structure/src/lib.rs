//! Skeleton connectivity repair and mesh reconstruction.
//!
//! A [`Structure`] is built from two annotation payloads (locations and
//! links), repairs its graph connectivity during construction, and
//! lazily builds a closed surface mesh on first request:
//!
//! 1. Decode records, scale units, drop excluded sections
//!    ([`ImportConfig`]).
//! 2. Label connected components and bridge them into one connected
//!    graph ([`label_components`], [`bridge_components`]).
//! 3. On first mesh request: sample, extract the alpha surface, and
//!    repair it under the configured [`RepairPolicy`].
//!
//! Volume and centroid are derived from the cached mesh on demand.
//!
//! # Example
//!
//! ```
//! use skel_structure::{ImportConfig, Structure};
//!
//! let locations = r#"{"value": [
//!     {"ID": 1, "VolumeX": 0.0, "VolumeY": 0.0, "Z": 0.0, "Radius": 400.0}
//! ]}"#;
//! let links = r#"{"value": []}"#;
//!
//! let structure =
//!     Structure::from_annotation(1, locations, links, &ImportConfig::default()).unwrap();
//! let mesh = structure.mesh();
//! assert!(mesh.face_count() > 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod connectivity;
mod decode;
mod error;
mod pipeline;
mod structure;

pub use config::ImportConfig;
pub use connectivity::{build_adjacency, bridge_components, label_components, BridgeMode};
pub use error::{StructureError, StructureResult};
pub use pipeline::{build_mesh, PipelineParams, RepairPolicy};
pub use structure::{random_pastel_color, Structure};
