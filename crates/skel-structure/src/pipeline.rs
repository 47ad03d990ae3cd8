//! The mesh reconstruction pipeline.
//!
//! Fixed stage order: sample the skeleton into a point cloud, extract
//! the raw alpha-shape surface, then repair it under the configured
//! policy. Every failure mode degrades to a smaller (possibly empty)
//! mesh with a log line; the pipeline never reports an error to the
//! caller.

use skel_repair::{
    compact_vertices, fill_all_holes, normalize_winding, remove_non_manifold_vertices,
    smooth_windowed_sinc, weld_coincident_vertices, SmoothParams,
};
use skel_surface::{
    alpha_shape_surface, AlphaShapeParams, PointCloud, SampleParams, SkeletonSampler,
};
use skel_types::{Link, Node, TriangleMesh};
use tracing::{info, warn};

/// Repair policy applied to the raw alpha-shape surface.
///
/// The two variants are mutually exclusive treatments of the same raw
/// surface, not stages of one pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepairPolicy {
    /// Weld, remove non-manifold vertices, fill holes, normalize
    /// winding. Produces a closed, consistently-oriented mesh when the
    /// repair succeeds.
    #[default]
    ManifoldRepair,
    /// Legacy variant: windowed-sinc smoothing of the raw surface only,
    /// no topological repair.
    SmoothOnly,
}

/// Parameters for [`build_mesh`].
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Which repair policy to apply.
    pub policy: RepairPolicy,
    /// Skeleton sampling density.
    pub sample: SampleParams,
    /// Alpha-shape extraction parameters.
    pub alpha: AlphaShapeParams,
    /// Weld tolerance for coincident vertices.
    pub weld_epsilon: f64,
    /// Smoothing parameters, used by [`RepairPolicy::SmoothOnly`].
    pub smooth: SmoothParams,
}

impl Default for PipelineParams {
    /// Manifold repair with a near-exact weld tolerance.
    fn default() -> Self {
        Self {
            policy: RepairPolicy::default(),
            sample: SampleParams::default(),
            alpha: AlphaShapeParams::default(),
            weld_epsilon: 1e-9,
            smooth: SmoothParams::default(),
        }
    }
}

impl PipelineParams {
    /// Alias for [`Default::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Run the full pipeline over a repaired skeleton.
///
/// Always returns a mesh; an empty one when sampling or extraction
/// produces nothing usable.
#[must_use]
pub fn build_mesh(nodes: &[Node], links: &[Link], params: &PipelineParams) -> TriangleMesh {
    let cloud: PointCloud = SkeletonSampler::new(nodes, links, params.sample).collect();
    info!(points = cloud.len(), "skeleton sampled");

    let raw = match alpha_shape_surface(&cloud, &params.alpha) {
        Ok(mesh) => mesh,
        Err(err) => {
            warn!(%err, "surface extraction failed; structure gets an empty mesh");
            return TriangleMesh::new();
        }
    };
    info!(
        vertices = raw.vertex_count(),
        faces = raw.face_count(),
        "raw surface extracted"
    );

    match params.policy {
        RepairPolicy::ManifoldRepair => repair(raw, params),
        RepairPolicy::SmoothOnly => smooth_windowed_sinc(&raw, &params.smooth),
    }
}

fn repair(mut mesh: TriangleMesh, params: &PipelineParams) -> TriangleMesh {
    let welded = weld_coincident_vertices(&mut mesh, params.weld_epsilon);
    if welded > 0 {
        compact_vertices(&mut mesh);
    }

    let manifold = remove_non_manifold_vertices(&mut mesh);
    info!(%manifold, "non-manifold pass done");

    match fill_all_holes(&mut mesh) {
        Ok(filled) => info!(filled, "hole filling done"),
        Err(err) => warn!(%err, "hole filling incomplete; continuing with open mesh"),
    }

    let winding = normalize_winding(&mut mesh);
    info!(%winding, "orientation normalized");

    mesh
}
