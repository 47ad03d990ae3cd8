//! Mesh export for reconstructed skeleton surfaces.
//!
//! Binary and ASCII STL writers for [`skel_types::TriangleMesh`].

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod stl;

pub use error::{ExportError, ExportResult};
pub use stl::{save_stl, save_stl_ascii};
