//! Skeleton node type.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a node within a structure.
///
/// Ids come from the external annotation source and are unique within a
/// structure but carry no other meaning.
pub type NodeId = i64;

/// A point of a traced skeleton.
///
/// Nodes are created once during structure import. Component labeling
/// mutates `graph_id` and connectivity repair appends to `linked_nodes`;
/// everything else is immutable afterward.
///
/// # Example
///
/// ```
/// use skel_types::Node;
/// use nalgebra::Point3;
///
/// let mut node = Node::new(42, Point3::new(0.0, 1.0, 2.0), 0.25);
/// assert!(!node.is_labeled());
///
/// node.graph_id = 1;
/// assert!(node.is_labeled());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Unique id within the owning structure.
    pub id: NodeId,

    /// Position in physical units.
    pub position: Point3<f64>,

    /// Radius in physical units.
    pub radius: f64,

    /// Connected-component label. `0` means unassigned; labeling assigns
    /// positive labels starting at 1.
    pub graph_id: u32,

    /// Ids of neighboring nodes, in the order links were recorded.
    /// Duplicates are permitted.
    pub linked_nodes: Vec<NodeId>,
}

impl Node {
    /// Create an unlabeled node with no neighbors.
    #[must_use]
    pub const fn new(id: NodeId, position: Point3<f64>, radius: f64) -> Self {
        Self {
            id,
            position,
            radius,
            graph_id: 0,
            linked_nodes: Vec::new(),
        }
    }

    /// Whether the node has been assigned a component label.
    #[inline]
    #[must_use]
    pub const fn is_labeled(&self) -> bool {
        self.graph_id != 0
    }

    /// Euclidean distance to another node.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.position - other.position).norm()
    }
}
