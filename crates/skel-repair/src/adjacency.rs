//! Edge-to-face adjacency for a triangle mesh.

use hashbrown::HashMap;

/// Edge adjacency of a triangle mesh.
///
/// Classifies edges by the number of adjacent faces: exactly one adjacent
/// face is a boundary edge (part of a hole), more than two is a
/// non-manifold edge (more than two sheets meeting).
///
/// # Example
///
/// ```
/// use skel_repair::MeshAdjacency;
///
/// let faces = vec![[0, 1, 2], [1, 3, 2]];
/// let adj = MeshAdjacency::build(&faces);
///
/// assert_eq!(adj.boundary_edge_count(), 4);
/// assert!(adj.is_manifold());
/// ```
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    /// Edge `(v0, v1)` with `v0 < v1` mapped to adjacent face indices.
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
}

impl MeshAdjacency {
    /// Build adjacency from a face list.
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();

        for (face_idx, face) in faces.iter().enumerate() {
            for (a, b) in face_edges(face) {
                edge_to_faces
                    .entry(normalize_edge(a, b))
                    .or_default()
                    .push(face_idx);
            }
        }

        Self { edge_to_faces }
    }

    /// Faces adjacent to an edge, in either direction. `None` if the edge
    /// does not exist.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&normalize_edge(v0, v1))
            .map(Vec::as_slice)
    }

    /// Iterate over boundary edges (exactly one adjacent face).
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Iterate over non-manifold edges (more than two adjacent faces).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(&edge, _)| edge)
    }

    /// Number of non-manifold edges.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Whether every edge has at most two adjacent faces.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() <= 2)
    }

    /// Whether no edge is a boundary edge.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() >= 2)
    }

    /// Total number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }
}

/// The three undirected edges of a face, in winding order.
pub(crate) fn face_edges(face: &[u32; 3]) -> [(u32, u32); 3] {
    [
        (face[0], face[1]),
        (face[1], face[2]),
        (face[2], face[0]),
    ]
}

/// Normalize edge direction so the smaller index comes first.
#[inline]
pub(crate) fn normalize_edge(v0: u32, v1: u32) -> (u32, u32) {
    if v0 < v1 {
        (v0, v1)
    } else {
        (v1, v0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_is_all_boundary() {
        let adj = MeshAdjacency::build(&[[0, 1, 2]]);
        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(!adj.is_watertight());
        assert!(adj.is_manifold());
    }

    #[test]
    fn shared_edge_is_interior() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
        assert_eq!(adj.faces_for_edge(1, 2).map(<[usize]>::len), Some(2));
        assert_eq!(adj.faces_for_edge(2, 1).map(<[usize]>::len), Some(2));
        assert_eq!(adj.boundary_edge_count(), 4);
    }

    #[test]
    fn three_faces_on_one_edge_is_non_manifold() {
        let adj = MeshAdjacency::build(&[[0, 1, 2], [0, 1, 3], [0, 1, 4]]);
        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert!(!adj.is_manifold());
        let edges: Vec<_> = adj.non_manifold_edges().collect();
        assert_eq!(edges, vec![(0, 1)]);
    }

    #[test]
    fn nonexistent_edge() {
        let adj = MeshAdjacency::build(&[[0, 1, 2]]);
        assert!(adj.faces_for_edge(0, 9).is_none());
    }

    #[test]
    fn closed_cube_is_clean() {
        let cube = skel_types::unit_cube();
        let adj = MeshAdjacency::build(&cube.faces);
        assert!(adj.is_watertight());
        assert!(adj.is_manifold());
        assert_eq!(adj.edge_count(), 18);
    }
}
