//! Face winding normalization.
//!
//! Makes every face of each connected component wind the same way, then
//! flips the whole mesh if its signed volume says the normals point
//! inward. Signed volume only means anything on a closed surface, so
//! this pass runs after hole filling.

use hashbrown::HashMap;
use skel_types::TriangleMesh;
use tracing::{debug, info};

use crate::adjacency::{face_edges, normalize_edge};

/// Summary of a winding normalization pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindingSummary {
    /// Faces whose winding was reversed during region growing.
    pub flipped: usize,
    /// Connected face components visited.
    pub components: usize,
    /// Whether the whole mesh was flipped to face outward at the end.
    pub globally_flipped: bool,
}

impl std::fmt::Display for WindingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WindingSummary: {} faces flipped across {} components, global flip: {}",
            self.flipped, self.components, self.globally_flipped
        )
    }
}

/// Count manifold interior edges traversed in the same direction by both
/// adjacent faces.
///
/// On a consistently wound surface every shared edge appears once in each
/// direction, so this is zero.
#[must_use]
pub fn count_inconsistent_edges(mesh: &TriangleMesh) -> usize {
    // Normalized edge -> traversal counts (low-to-high, high-to-low).
    let mut traversals: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
    for face in &mesh.faces {
        for (a, b) in face_edges(face) {
            let counts = traversals.entry(normalize_edge(a, b)).or_default();
            if a < b {
                counts.0 += 1;
            } else {
                counts.1 += 1;
            }
        }
    }

    traversals
        .values()
        .filter(|&&(forward, backward)| {
            forward + backward == 2 && (forward == 2 || backward == 2)
        })
        .count()
}

/// Orient every face consistently, then flip the mesh outward.
///
/// Region growing walks face-to-face over shared edges starting from an
/// arbitrary seed per component; a neighbor traversing the shared edge
/// in the same direction as the current face is reversed. Afterwards the
/// signed volume decides whether the whole mesh needs one global flip.
///
/// # Example
///
/// ```
/// use skel_types::unit_cube;
/// use skel_repair::{count_inconsistent_edges, normalize_winding};
///
/// let mut cube = unit_cube();
/// cube.faces[7].swap(1, 2); // break one face
/// assert!(count_inconsistent_edges(&cube) > 0);
///
/// let summary = normalize_winding(&mut cube);
/// assert_eq!(summary.flipped, 1);
/// assert_eq!(count_inconsistent_edges(&cube), 0);
/// assert!(cube.volume() > 0.9);
/// ```
pub fn normalize_winding(mesh: &mut TriangleMesh) -> WindingSummary {
    if mesh.faces.is_empty() {
        return WindingSummary::default();
    }

    // Undirected edge -> adjacent faces.
    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (face_idx, face) in mesh.faces.iter().enumerate() {
        for (a, b) in face_edges(face) {
            edge_faces
                .entry(normalize_edge(a, b))
                .or_default()
                .push(face_idx);
        }
    }

    let mut visited = vec![false; mesh.faces.len()];
    let mut flipped = 0;
    let mut components = 0;

    for seed in 0..mesh.faces.len() {
        if visited[seed] {
            continue;
        }
        components += 1;

        let mut stack = vec![seed];
        visited[seed] = true;

        while let Some(face_idx) = stack.pop() {
            let edges = face_edges(&mesh.faces[face_idx]);

            for (a, b) in edges {
                let Some(adjacent) = edge_faces.get(&normalize_edge(a, b)) else {
                    continue;
                };
                // Non-manifold edges have no well-defined orientation
                // relation; skip them.
                if adjacent.len() != 2 {
                    continue;
                }

                for &neighbor in adjacent {
                    if neighbor == face_idx || visited[neighbor] {
                        continue;
                    }

                    // Consistent neighbors traverse the shared edge in
                    // the opposite direction.
                    if traverses_edge(&mesh.faces[neighbor], a, b) {
                        mesh.faces[neighbor].swap(1, 2);
                        flipped += 1;
                    }

                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
    }

    debug!(flipped, components, "winding made consistent");

    let globally_flipped = mesh.is_inside_out();
    if globally_flipped {
        mesh.flip_all_faces();
        info!("mesh was inside out; flipped all faces");
    }

    WindingSummary {
        flipped,
        components,
        globally_flipped,
    }
}

/// Whether `face` contains the directed edge `a -> b`.
fn traverses_edge(face: &[u32; 3], a: u32, b: u32) -> bool {
    face_edges(face).iter().any(|&(x, y)| x == a && y == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skel_types::unit_cube;

    #[test]
    fn clean_cube_has_no_inconsistent_edges() {
        let cube = unit_cube();
        assert_eq!(count_inconsistent_edges(&cube), 0);
    }

    #[test]
    fn high_to_low_shared_edge_is_counted() {
        // Both faces traverse the shared edge {1, 2} as 2 -> 1, so the
        // only directed entry runs from the higher index to the lower.
        let mesh = TriangleMesh::from_parts(
            vec![
                nalgebra::Point3::new(0.0, 0.0, 0.0),
                nalgebra::Point3::new(1.0, 0.0, 0.0),
                nalgebra::Point3::new(1.0, 1.0, 0.0),
                nalgebra::Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[2, 1, 0], [3, 2, 1]],
        );
        assert_eq!(count_inconsistent_edges(&mesh), 1);

        let mut oriented = mesh;
        normalize_winding(&mut oriented);
        assert_eq!(count_inconsistent_edges(&oriented), 0);
    }

    #[test]
    fn broken_face_is_detected_and_fixed() {
        let mut cube = unit_cube();
        cube.faces[5].swap(0, 2);
        assert!(count_inconsistent_edges(&cube) > 0);

        let summary = normalize_winding(&mut cube);
        assert_eq!(summary.components, 1);
        assert_eq!(count_inconsistent_edges(&cube), 0);
        assert!((cube.volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inside_out_cube_is_flipped_outward() {
        let mut cube = unit_cube();
        cube.flip_all_faces();
        assert!(cube.is_inside_out());

        let summary = normalize_winding(&mut cube);
        assert!(summary.globally_flipped);
        // Already consistent among themselves, just inverted.
        assert_eq!(summary.flipped, 0);
        assert!(cube.signed_volume() > 0.0);
    }

    #[test]
    fn already_clean_cube_is_untouched() {
        let mut cube = unit_cube();
        let faces_before = cube.faces.clone();
        let summary = normalize_winding(&mut cube);

        assert_eq!(summary.flipped, 0);
        assert!(!summary.globally_flipped);
        assert_eq!(cube.faces, faces_before);
    }

    #[test]
    fn empty_mesh_is_a_noop() {
        let mut mesh = TriangleMesh::new();
        let summary = normalize_winding(&mut mesh);
        assert_eq!(summary.components, 0);
        assert_eq!(summary.flipped, 0);
    }

    #[test]
    fn disconnected_components_are_each_oriented() {
        // Two cubes with disjoint vertex ranges.
        let first = unit_cube();
        let mut mesh = first.clone();
        #[allow(clippy::cast_possible_truncation)]
        let offset = mesh.vertices.len() as u32;
        for v in &first.vertices {
            mesh.vertices
                .push(nalgebra::Point3::new(v.x + 5.0, v.y, v.z));
        }
        for face in &first.faces {
            mesh.faces
                .push([face[0] + offset, face[1] + offset, face[2] + offset]);
        }
        // Break one face in the second cube.
        let last = mesh.faces.len() - 1;
        mesh.faces[last].swap(1, 2);

        let summary = normalize_winding(&mut mesh);
        assert_eq!(summary.components, 2);
        assert_eq!(summary.flipped, 1);
        assert_eq!(count_inconsistent_edges(&mesh), 0);
    }

    #[test]
    fn summary_display() {
        let summary = WindingSummary {
            flipped: 3,
            components: 2,
            globally_flipped: true,
        };
        let text = format!("{summary}");
        assert!(text.contains("3 faces"));
        assert!(text.contains("2 components"));
    }
}
