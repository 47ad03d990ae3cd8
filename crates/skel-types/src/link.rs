//! Skeleton link type.

use crate::node::NodeId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An unordered connection between two skeleton nodes.
///
/// A link is valid only when both endpoints exist in the owning
/// structure's node set; invalid links are dropped silently at import
/// time. Links compare as unordered pairs: `(a, b)` equals `(b, a)`.
///
/// # Example
///
/// ```
/// use skel_types::Link;
///
/// let link = Link::new(3, 7);
/// assert!(link.contains(7));
/// assert_eq!(link.other(3), Some(7));
/// assert_eq!(Link::new(3, 7), Link::new(7, 3));
/// ```
#[derive(Debug, Clone, Copy, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    /// First endpoint id.
    pub a: NodeId,
    /// Second endpoint id.
    pub b: NodeId,
}

impl Link {
    /// Create a link between two node ids.
    #[inline]
    #[must_use]
    pub const fn new(a: NodeId, b: NodeId) -> Self {
        Self { a, b }
    }

    /// Whether the link touches the given node id.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint opposite to `id`, or `None` if `id` is not an endpoint.
    #[must_use]
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }

    /// Endpoints with the smaller id first.
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> (NodeId, NodeId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl std::hash::Hash for Link {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_unordered() {
        assert_eq!(Link::new(1, 2), Link::new(2, 1));
        assert_eq!(Link::new(1, 2).normalized(), (1, 2));
        assert_eq!(Link::new(2, 1).normalized(), (1, 2));
    }

    #[test]
    fn other_endpoint() {
        let link = Link::new(5, 9);
        assert_eq!(link.other(5), Some(9));
        assert_eq!(link.other(9), Some(5));
        assert_eq!(link.other(1), None);
    }

    #[test]
    fn self_link_contains() {
        let link = Link::new(4, 4);
        assert!(link.contains(4));
        assert_eq!(link.other(4), Some(4));
    }
}
