//! Property-based tests for the repair passes.
//!
//! Random face soups exercise the passes well outside the clean-mesh
//! happy path; the invariants checked here must hold for any input.
//!
//! Run with: cargo test -p skel-repair -- proptest

use nalgebra::Point3;
use proptest::prelude::*;
use skel_repair::{
    count_inconsistent_edges, fill_all_holes, normalize_winding, remove_non_manifold_vertices,
    smooth_windowed_sinc, weld_coincident_vertices, MeshAdjacency, SmoothParams,
};
use skel_types::TriangleMesh;

// =============================================================================
// Strategies
// =============================================================================

fn arb_position() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-100.0..100.0f64)
}

/// A mesh with valid face indices but otherwise arbitrary topology:
/// duplicated faces, degenerate faces, and non-manifold edges all occur.
fn arb_mesh(
    min_vertices: usize,
    max_vertices: usize,
    max_faces: usize,
) -> impl Strategy<Value = TriangleMesh> {
    (min_vertices..=max_vertices).prop_flat_map(move |num_vertices| {
        let vertices = prop::collection::vec(arb_position(), num_vertices);

        vertices.prop_flat_map(move |positions| {
            let n = positions.len() as u32;
            let face = prop::array::uniform3(0..n);
            let faces = prop::collection::vec(face, 0..=max_faces);

            faces.prop_map(move |f| {
                TriangleMesh::from_parts(
                    positions
                        .iter()
                        .map(|&[x, y, z]| Point3::new(x, y, z))
                        .collect(),
                    f,
                )
            })
        })
    })
}

fn all_indices_valid(mesh: &TriangleMesh) -> bool {
    let n = mesh.vertices.len() as u32;
    mesh.faces.iter().all(|face| face.iter().all(|&v| v < n))
}

// =============================================================================
// Welding
// =============================================================================

proptest! {
    #[test]
    fn weld_never_increases_vertices(mesh in arb_mesh(3, 30, 50)) {
        let before = mesh.vertex_count();
        let mut welded = mesh;
        weld_coincident_vertices(&mut welded, 0.001);
        prop_assert!(welded.vertex_count() <= before);
    }

    /// Welding may drop collapsed faces but never adds any.
    #[test]
    fn weld_never_adds_faces(mesh in arb_mesh(3, 30, 50)) {
        let before = mesh.face_count();
        let mut welded = mesh;
        weld_coincident_vertices(&mut welded, 0.01);
        prop_assert!(welded.face_count() <= before);
    }

    #[test]
    fn weld_keeps_indices_valid(mesh in arb_mesh(3, 30, 50)) {
        let mut welded = mesh;
        weld_coincident_vertices(&mut welded, 0.01);
        prop_assert!(all_indices_valid(&welded));
    }
}

// =============================================================================
// Non-manifold removal
// =============================================================================

proptest! {
    /// Deleting faces only lowers edge multiplicities, so a single pass
    /// can never end with more flagged points than it started with.
    #[test]
    fn non_manifold_removal_is_monotone(mesh in arb_mesh(3, 30, 50)) {
        let mut repaired = mesh;
        let repair = remove_non_manifold_vertices(&mut repaired);
        prop_assert!(repair.points_after <= repair.points_before);
    }

    #[test]
    fn non_manifold_removal_keeps_indices_valid(mesh in arb_mesh(3, 30, 50)) {
        let mut repaired = mesh;
        remove_non_manifold_vertices(&mut repaired);
        prop_assert!(all_indices_valid(&repaired));
    }

    /// A second pass on the output finds the same flagged set the first
    /// pass reported as remaining.
    #[test]
    fn non_manifold_recount_matches_second_pass(mesh in arb_mesh(3, 20, 40)) {
        let mut repaired = mesh;
        let first = remove_non_manifold_vertices(&mut repaired);
        let second = remove_non_manifold_vertices(&mut repaired);
        prop_assert_eq!(first.points_after, second.points_before);
    }
}

// =============================================================================
// Holes and winding
// =============================================================================

proptest! {
    #[test]
    fn adjacency_never_panics(mesh in arb_mesh(3, 40, 80)) {
        let adjacency = MeshAdjacency::build(&mesh.faces);
        let _ = adjacency.boundary_edge_count();
        let _ = adjacency.non_manifold_edge_count();
    }

    /// Hole filling only ever adds faces.
    #[test]
    fn hole_filling_never_removes_faces(mesh in arb_mesh(3, 20, 30)) {
        let before = mesh.face_count();
        let mut filled = mesh;
        if fill_all_holes(&mut filled).is_ok() {
            prop_assert!(filled.face_count() >= before);
        }
    }

    #[test]
    fn winding_preserves_counts(mesh in arb_mesh(3, 30, 50)) {
        let faces_before = mesh.face_count();
        let vertices_before = mesh.vertex_count();
        let mut oriented = mesh;
        normalize_winding(&mut oriented);
        prop_assert_eq!(oriented.face_count(), faces_before);
        prop_assert_eq!(oriented.vertex_count(), vertices_before);
    }

    #[test]
    fn inconsistency_count_never_panics(mesh in arb_mesh(3, 30, 50)) {
        let _ = count_inconsistent_edges(&mesh);
    }
}

// =============================================================================
// Smoothing
// =============================================================================

proptest! {
    /// Smoothing moves vertices but never changes connectivity.
    #[test]
    fn smoothing_preserves_topology(mesh in arb_mesh(3, 30, 50)) {
        let smoothed = smooth_windowed_sinc(&mesh, &SmoothParams::default());
        prop_assert_eq!(&smoothed.faces, &mesh.faces);
        prop_assert_eq!(smoothed.vertex_count(), mesh.vertex_count());
    }

    /// All positions stay finite for finite input.
    #[test]
    fn smoothing_stays_finite(mesh in arb_mesh(3, 20, 40)) {
        let params = SmoothParams { iterations: 5, ..SmoothParams::default() };
        let smoothed = smooth_windowed_sinc(&mesh, &params);
        for v in &smoothed.vertices {
            prop_assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
        }
    }
}

// =============================================================================
// Deterministic pipeline check
// =============================================================================

#[test]
fn full_pipeline_closes_an_open_box() {
    let mut mesh = skel_types::unit_cube();
    // Remove the top.
    mesh.faces.remove(3);
    mesh.faces.remove(2);

    weld_coincident_vertices(&mut mesh, 1e-9);
    remove_non_manifold_vertices(&mut mesh);
    fill_all_holes(&mut mesh).unwrap();
    normalize_winding(&mut mesh);

    let adjacency = MeshAdjacency::build(&mesh.faces);
    assert!(adjacency.is_watertight());
    assert!(adjacency.is_manifold());
    assert_eq!(count_inconsistent_edges(&mesh), 0);
    assert!((mesh.volume() - 1.0).abs() < 1e-9);
}
