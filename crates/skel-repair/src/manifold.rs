//! Non-manifold vertex detection and removal.
//!
//! A raw reconstruction frequently contains edges shared by more than two
//! faces. Every vertex on such an edge is a non-manifold point; deleting
//! all faces that touch one punches holes into the surface, which the
//! hole-filling pass closes afterwards.

use hashbrown::HashSet;
use skel_types::TriangleMesh;
use tracing::{debug, warn};

use crate::adjacency::MeshAdjacency;
use crate::weld::compact_vertices;

/// Summary of a non-manifold removal pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonManifoldRepair {
    /// Non-manifold points flagged before deletion.
    pub points_before: usize,
    /// Non-manifold points remaining after the single deletion pass.
    pub points_after: usize,
    /// Faces deleted.
    pub faces_removed: usize,
    /// Vertices dropped by the subsequent compaction.
    pub vertices_dropped: usize,
}

impl std::fmt::Display for NonManifoldRepair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NonManifoldRepair: {} -> {} flagged points, {} faces removed, {} vertices dropped",
            self.points_before, self.points_after, self.faces_removed, self.vertices_dropped
        )
    }
}

/// Vertex indices that lie on a non-manifold edge, ascending and unique.
#[must_use]
pub fn non_manifold_points(adjacency: &MeshAdjacency) -> Vec<u32> {
    let mut points: Vec<u32> = adjacency
        .non_manifold_edges()
        .flat_map(|(a, b)| [a, b])
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    points.sort_unstable();
    points
}

/// Delete every face that touches a non-manifold point, then compact.
///
/// The deletion criterion is positional: a face is removed when any of
/// its vertices sits at exactly the same coordinates as a flagged point,
/// so exact duplicates that survived welding are removed along with the
/// flagged vertex itself.
///
/// This is a single pass by design. Deleting faces can itself expose new
/// non-manifold configurations; the pass recounts afterwards purely for
/// diagnostics and never loops, so pathological inputs may retain
/// residual non-manifold geometry (reported via `points_after`).
///
/// # Example
///
/// ```
/// use skel_types::TriangleMesh;
/// use skel_repair::remove_non_manifold_vertices;
/// use nalgebra::Point3;
///
/// // Three faces share the edge 0-1: a non-manifold fin.
/// let mut mesh = TriangleMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.5, 1.0, 0.0),
///         Point3::new(0.5, -1.0, 0.0),
///         Point3::new(0.5, 0.0, 1.0),
///     ],
///     vec![[0, 1, 2], [0, 1, 3], [0, 1, 4]],
/// );
///
/// let repair = remove_non_manifold_vertices(&mut mesh);
/// assert_eq!(repair.points_before, 2);
/// assert_eq!(repair.faces_removed, 3);
/// assert_eq!(repair.points_after, 0);
/// ```
pub fn remove_non_manifold_vertices(mesh: &mut TriangleMesh) -> NonManifoldRepair {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let flagged = non_manifold_points(&adjacency);

    if flagged.is_empty() {
        return NonManifoldRepair::default();
    }

    // Coordinates of flagged points, bit-exact.
    let flagged_positions: HashSet<[u64; 3]> = flagged
        .iter()
        .map(|&v| position_bits(mesh, v))
        .collect();

    let before_faces = mesh.faces.len();
    let vertices = &mesh.vertices;
    mesh.faces.retain(|face| {
        !face.iter().any(|&v| {
            let p = &vertices[v as usize];
            flagged_positions.contains(&[p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
        })
    });
    let faces_removed = before_faces - mesh.faces.len();

    let vertices_dropped = compact_vertices(mesh);

    // Diagnostic recount only; no second deletion pass.
    let after = non_manifold_points(&MeshAdjacency::build(&mesh.faces)).len();
    if after > 0 {
        warn!(
            remaining = after,
            "non-manifold geometry remains after single-pass removal"
        );
    } else {
        debug!(faces_removed, "non-manifold removal complete");
    }

    NonManifoldRepair {
        points_before: flagged.len(),
        points_after: after,
        faces_removed,
        vertices_dropped,
    }
}

fn position_bits(mesh: &TriangleMesh, vertex: u32) -> [u64; 3] {
    let p = &mesh.vertices[vertex as usize];
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}
