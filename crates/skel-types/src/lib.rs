//! Core types for skeleton-to-surface reconstruction.
//!
//! This crate provides the foundational types shared by the rest of the
//! workspace:
//!
//! - [`Node`] - A traced skeleton point with a radius and component label
//! - [`Link`] - An unordered connection between two nodes
//! - [`TriangleMesh`] - An indexed triangle mesh with mass properties
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Color`] - An 8-bit RGB display color
//!
//! # Units
//!
//! All coordinates are `f64` in physical units (micrometers after the
//! import stage has applied pixel and section scaling). The mesh types
//! themselves are unit-agnostic.
//!
//! # Coordinate System
//!
//! Right-handed, with Z along the sectioning axis. Face winding is
//! counter-clockwise when viewed from outside, so normals point outward
//! by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use skel_types::{Node, TriangleMesh};
//! use nalgebra::Point3;
//!
//! let node = Node::new(7, Point3::new(1.0, 2.0, 3.0), 0.5);
//! assert_eq!(node.id, 7);
//! assert!(!node.is_labeled());
//!
//! let mesh = TriangleMesh::new();
//! assert!(mesh.is_empty());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod color;
mod link;
mod mesh;
mod node;
mod triangle;

pub use color::Color;
pub use link::Link;
pub use mesh::{unit_cube, TriangleMesh};
pub use node::{Node, NodeId};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
