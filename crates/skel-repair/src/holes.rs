//! Boundary-loop detection and hole filling.
//!
//! A hole is a closed loop of boundary edges (edges with a single
//! adjacent face). Holes come both from gaps in the raw reconstruction
//! and from the non-manifold deletion pass; all of them are filled, with
//! no upper size limit, so the surface can be closed for volume
//! measurement.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use skel_types::{Triangle, TriangleMesh};
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::error::{RepairError, RepairResult};

/// A closed loop of boundary vertices bounding a hole.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    /// Vertex indices in traversal order around the loop.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (equal to the number of vertices) in the loop.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Trace all boundary loops of the mesh.
///
/// Boundary edges are chained into closed loops by walking from vertex
/// to vertex. Open chains (malformed boundaries that never close) are
/// logged and skipped.
///
/// # Example
///
/// ```
/// use skel_types::TriangleMesh;
/// use skel_repair::{detect_boundary_loops, MeshAdjacency};
/// use nalgebra::Point3;
///
/// let mesh = TriangleMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// let adjacency = MeshAdjacency::build(&mesh.faces);
/// let loops = detect_boundary_loops(&adjacency);
/// assert_eq!(loops.len(), 1);
/// assert_eq!(loops[0].edge_count(), 3);
/// ```
#[must_use]
pub fn detect_boundary_loops(adjacency: &MeshAdjacency) -> Vec<BoundaryLoop> {
    let boundary_edges: Vec<(u32, u32)> = adjacency.boundary_edges().collect();
    if boundary_edges.is_empty() {
        return Vec::new();
    }

    debug!(count = boundary_edges.len(), "boundary edges found");

    let mut neighbors: HashMap<u32, Vec<u32>> = HashMap::new();
    for &(a, b) in &boundary_edges {
        neighbors.entry(a).or_default().push(b);
        neighbors.entry(b).or_default().push(a);
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();

    for &(start, _) in &boundary_edges {
        if visited.contains(&start) {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = start;
        let mut previous: Option<u32> = None;
        let mut closed = false;

        loop {
            visited.insert(current);
            chain.push(current);

            let adjacent = neighbors.get(&current).map(Vec::as_slice).unwrap_or(&[]);

            // Prefer an unvisited continuation; otherwise close back to
            // the start once the chain is long enough.
            let next = adjacent
                .iter()
                .find(|&&n| Some(n) != previous && !visited.contains(&n))
                .or_else(|| {
                    adjacent
                        .iter()
                        .find(|&&n| n == start && chain.len() > 2)
                });

            match next {
                Some(&n) if n == start => {
                    closed = true;
                    break;
                }
                Some(&n) => {
                    previous = Some(current);
                    current = n;
                }
                None => {
                    warn!(start, "boundary chain did not close; skipping");
                    break;
                }
            }
        }

        if closed && chain.len() >= 3 {
            loops.push(BoundaryLoop { vertices: chain });
        }
    }

    info!(
        holes = loops.len(),
        sizes = ?loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>(),
        "boundary loops traced"
    );

    loops
}

/// Fill every boundary loop of the mesh, regardless of size.
///
/// Each loop is triangulated by ear clipping with a fan fallback for
/// loops where clipping stalls. Returns the number of holes filled.
///
/// # Errors
///
/// Returns [`RepairError::HoleFillFailed`] if a loop produces no
/// triangles at all.
pub fn fill_all_holes(mesh: &mut TriangleMesh) -> RepairResult<usize> {
    let adjacency = MeshAdjacency::build(&mesh.faces);
    let loops = detect_boundary_loops(&adjacency);

    if loops.is_empty() {
        return Ok(0);
    }

    let mut filled = 0;
    for hole in &loops {
        let triangles = triangulate_loop(mesh, hole);
        if triangles.is_empty() {
            return Err(RepairError::HoleFillFailed {
                reason: format!("loop with {} edges produced no triangles", hole.edge_count()),
            });
        }
        mesh.faces.extend(triangles);
        filled += 1;
    }

    info!(filled, "holes filled");
    Ok(filled)
}

/// Triangulate one boundary loop by ear clipping.
///
/// Winding follows the loop's average normal; the final orientation pass
/// reconciles it with the rest of the surface.
#[must_use]
pub(crate) fn triangulate_loop(mesh: &TriangleMesh, hole: &BoundaryLoop) -> Vec<[u32; 3]> {
    let n = hole.vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let positions: Vec<Point3<f64>> = hole
        .vertices
        .iter()
        .map(|&idx| mesh.vertices[idx as usize])
        .collect();

    let normal = loop_normal(&positions);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let mut clipped = false;

        for i in 0..remaining.len() {
            let prev = remaining[(i + remaining.len() - 1) % remaining.len()];
            let curr = remaining[i];
            let next = remaining[(i + 1) % remaining.len()];

            if is_ear(&positions, &remaining, prev, curr, next, &normal) {
                triangles.push([
                    hole.vertices[prev],
                    hole.vertices[curr],
                    hole.vertices[next],
                ]);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            debug!(
                remaining = remaining.len(),
                "ear clipping stalled; falling back to fan triangulation"
            );
            break;
        }
    }

    if remaining.len() == 3 {
        triangles.push([
            hole.vertices[remaining[0]],
            hole.vertices[remaining[1]],
            hole.vertices[remaining[2]],
        ]);
    } else {
        // Fan from the first remaining vertex.
        for i in 1..remaining.len().saturating_sub(1) {
            triangles.push([
                hole.vertices[remaining[0]],
                hole.vertices[remaining[i]],
                hole.vertices[remaining[i + 1]],
            ]);
        }
    }

    triangles
}

/// Average normal of the loop, via the cross products around its centroid.
fn loop_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    let n = positions.len();
    #[allow(clippy::cast_precision_loss)]
    let centroid = Point3::from(
        positions
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / n as f64,
    );

    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = positions[i] - centroid;
        let b = positions[(i + 1) % n] - centroid;
        normal += a.cross(&b);
    }

    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::z()
    }
}

fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    loop_normal: &Vector3<f64>,
) -> bool {
    let tri = Triangle::new(positions[prev], positions[curr], positions[next]);
    let Some(tri_normal) = tri.normal() else {
        return false;
    };

    // Reflex corners face against the loop normal.
    if tri_normal.dot(loop_normal) < 0.0 {
        return false;
    }

    // No other loop vertex may fall inside the candidate ear.
    for &idx in remaining {
        if idx == prev || idx == curr || idx == next {
            continue;
        }
        if point_in_triangle(
            &positions[idx],
            &positions[prev],
            &positions[curr],
            &positions[next],
            loop_normal,
        ) {
            return false;
        }
    }

    true
}

/// Point-in-triangle test after projecting out the dominant normal axis.
fn point_in_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let (nx, ny, nz) = (normal.x.abs(), normal.y.abs(), normal.z.abs());

    let project = |q: &Point3<f64>| -> (f64, f64) {
        if nz >= nx && nz >= ny {
            (q.x, q.y)
        } else if ny >= nx {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };

    let (p2, a2, b2, c2) = (project(p), project(a), project(b), project(c));

    let orient = |u: (f64, f64), v: (f64, f64), w: (f64, f64)| -> f64 {
        (u.0 - w.0) * (v.1 - w.1) - (v.0 - w.0) * (u.1 - w.1)
    };

    let d1 = orient(p2, a2, b2);
    let d2 = orient(p2, b2, c2);
    let d3 = orient(p2, c2, a2);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
