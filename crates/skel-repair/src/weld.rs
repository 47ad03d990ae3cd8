//! Coincident-vertex welding and vertex compaction.

use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use skel_types::TriangleMesh;
use tracing::debug;

/// Merge vertices that lie within `epsilon` of each other.
///
/// Independent sampling and reconstruction passes introduce duplicated
/// points at shared locations; this pass redirects all faces to one
/// canonical vertex per cluster. Faces collapsed to fewer than three
/// distinct vertices by the merge are dropped. Merged-away vertices are
/// left in place; run [`compact_vertices`] afterwards to drop them.
///
/// Returns the number of vertices merged away.
///
/// # Example
///
/// ```
/// use skel_types::TriangleMesh;
/// use skel_repair::weld_coincident_vertices;
/// use nalgebra::Point3;
///
/// let mut mesh = TriangleMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // duplicate of 1
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 3, 2]);
///
/// let merged = weld_coincident_vertices(&mut mesh, 1e-9);
/// assert_eq!(merged, 1);
/// assert_eq!(mesh.faces[1], [0, 1, 2]);
/// ```
pub fn weld_coincident_vertices(mesh: &mut TriangleMesh, epsilon: f64) -> usize {
    if mesh.vertices.is_empty() {
        return 0;
    }

    let cell_size = (epsilon * 2.0).max(f64::MIN_POSITIVE);

    // Spatial hash over vertex positions.
    let mut cells: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, position) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        cells
            .entry(position_cell(position, cell_size))
            .or_default()
            .push(idx as u32);
    }

    #[allow(clippy::cast_possible_truncation)]
    let mut remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();
    let mut merged = 0;

    for (idx, position) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let idx = idx as u32;
        if remap[idx as usize] != idx {
            continue; // already merged into an earlier vertex
        }

        let cell = position_cell(position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(candidates) = cells.get(&neighbor) else {
                        continue;
                    };

                    for &other in candidates {
                        if other <= idx || remap[other as usize] != other {
                            continue;
                        }
                        let dist = (mesh.vertices[other as usize] - position).norm();
                        if dist <= epsilon {
                            remap[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    if merged == 0 {
        return 0;
    }

    // Resolve transitive chains so every entry points at its root.
    for i in 0..remap.len() {
        let mut root = remap[i];
        while remap[root as usize] != root {
            root = remap[root as usize];
        }
        remap[i] = root;
    }

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            *v = remap[*v as usize];
        }
    }

    // Drop faces collapsed by the merge.
    mesh.faces
        .retain(|&[i0, i1, i2]| i0 != i1 && i1 != i2 && i0 != i2);

    debug!(merged, "welded coincident vertices");
    merged
}

/// Drop vertices no face references and reindex the face list.
///
/// Returns the number of vertices removed.
pub fn compact_vertices(mesh: &mut TriangleMesh) -> usize {
    let original = mesh.vertices.len();

    let mut referenced: HashSet<u32> = HashSet::new();
    for face in &mesh.faces {
        referenced.extend(face.iter().copied());
    }

    if referenced.len() == original {
        return 0;
    }

    let mut kept = Vec::with_capacity(referenced.len());
    let mut remap: HashMap<u32, u32> = HashMap::with_capacity(referenced.len());

    for (old_idx, position) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let old_idx = old_idx as u32;
        if referenced.contains(&old_idx) {
            #[allow(clippy::cast_possible_truncation)]
            remap.insert(old_idx, kept.len() as u32);
            kept.push(*position);
        }
    }

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            *v = remap[v];
        }
    }

    let removed = original - kept.len();
    mesh.vertices = kept;

    debug!(removed, "compacted unreferenced vertices");
    removed
}

fn position_cell(position: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    #[allow(clippy::cast_possible_truncation)]
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
        (position.z / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> TriangleMesh {
        TriangleMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(0.0, 10.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn weld_empty_mesh() {
        let mut mesh = TriangleMesh::new();
        assert_eq!(weld_coincident_vertices(&mut mesh, 1e-6), 0);
    }

    #[test]
    fn weld_near_duplicate() {
        let mut mesh = triangle_mesh();
        mesh.vertices.push(Point3::new(10.0 + 1e-10, 0.0, 0.0));
        mesh.faces.push([0, 3, 2]);

        let merged = weld_coincident_vertices(&mut mesh, 1e-6);
        assert_eq!(merged, 1);
        assert_eq!(mesh.faces[1], [0, 1, 2]);
    }

    #[test]
    fn weld_leaves_distinct_vertices() {
        let mut mesh = triangle_mesh();
        let merged = weld_coincident_vertices(&mut mesh, 1e-6);
        assert_eq!(merged, 0);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn weld_drops_collapsed_faces() {
        // Two vertices at the same spot make the face degenerate.
        let mut mesh = TriangleMesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        weld_coincident_vertices(&mut mesh, 1e-9);
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn compact_removes_orphans() {
        let mut mesh = triangle_mesh();
        mesh.vertices.push(Point3::new(99.0, 99.0, 99.0));

        let removed = compact_vertices(&mut mesh);
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn compact_noop_when_all_referenced() {
        let mut mesh = triangle_mesh();
        assert_eq!(compact_vertices(&mut mesh), 0);
    }

    #[test]
    fn compact_reindexes_faces() {
        let mut mesh = TriangleMesh::from_parts(
            vec![
                Point3::new(9.0, 9.0, 9.0), // orphan at index 0
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[1, 2, 3]],
        );
        compact_vertices(&mut mesh);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert!((mesh.vertices[0].x - 0.0).abs() < 1e-12);
    }
}
