//! Surface extraction for traced skeletons.
//!
//! Turns a skeleton (nodes with radii, links between them) into a raw
//! triangle surface in two steps:
//!
//! 1. [`SkeletonSampler`] samples the skeleton into a [`PointCloud`]:
//!    sphere shells around nodes, tube rings along links.
//! 2. [`alpha_shape_surface`] extracts the alpha-shape triangles of the
//!    cloud.
//!
//! The output is deliberately raw. It usually has non-manifold edges and
//! open boundaries; cleaning it up is the repair pipeline's job.
//!
//! # Example
//!
//! ```
//! use skel_surface::{alpha_shape_surface, AlphaShapeParams, PointCloud, SampleParams,
//!     SkeletonSampler};
//! use skel_types::{Node, Point3};
//!
//! let nodes = vec![Node::new(1, Point3::new(0.0, 0.0, 0.0), 1.0)];
//! let cloud: PointCloud =
//!     SkeletonSampler::new(&nodes, &[], SampleParams::default()).collect();
//!
//! let mesh = alpha_shape_surface(&cloud, &AlphaShapeParams::default()).unwrap();
//! assert!(mesh.face_count() > 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod alpha;
mod cloud;
mod error;
mod sample;

pub use alpha::{alpha_shape_surface, AlphaShapeParams};
pub use cloud::PointCloud;
pub use error::{SurfaceError, SurfaceResult};
pub use sample::{SampleParams, SkeletonSampler};
