//! Alpha-shape surface extraction.
//!
//! A candidate triangle between nearby points belongs to the alpha
//! surface when its circumradius is at most alpha and at least one of
//! the two balls of radius alpha through its vertices contains no other
//! point. The output is a raw face soup over the input points; welding,
//! non-manifold removal, hole filling, and orientation are downstream
//! passes.

use hashbrown::HashSet;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point3, Vector3};
use skel_types::TriangleMesh;
use tracing::{debug, info};

use crate::cloud::PointCloud;
use crate::error::{SurfaceError, SurfaceResult};

/// Minimum number of points for a surface.
const MIN_POINTS: usize = 4;

/// Tolerance for the empty-ball containment test.
const BALL_TOLERANCE: f64 = 1e-9;

/// Parameters for [`alpha_shape_surface`].
#[derive(Debug, Clone, Copy)]
pub struct AlphaShapeParams {
    /// Ball radius. `None` derives one from point density.
    pub alpha: Option<f64>,
    /// Neighbor count used for the density estimate.
    pub neighbor_k: usize,
}

impl Default for AlphaShapeParams {
    /// Density-derived alpha from 12 neighbors.
    fn default() -> Self {
        Self {
            alpha: None,
            neighbor_k: 12,
        }
    }
}

/// Extract the alpha-shape surface of a point cloud.
///
/// The mesh's vertex list is the cloud's point list unchanged; faces
/// index into it. The result is typically non-manifold and open in
/// places.
///
/// # Errors
///
/// - [`SurfaceError::EmptyPointCloud`] for an empty cloud
/// - [`SurfaceError::InsufficientPoints`] for fewer than four points
/// - [`SurfaceError::ExtractionFailed`] when no triangle qualifies, which
///   usually means alpha is too small for the sampling density
pub fn alpha_shape_surface(
    cloud: &PointCloud,
    params: &AlphaShapeParams,
) -> SurfaceResult<TriangleMesh> {
    if cloud.is_empty() {
        return Err(SurfaceError::EmptyPointCloud);
    }
    if cloud.len() < MIN_POINTS {
        return Err(SurfaceError::InsufficientPoints {
            required: MIN_POINTS,
            actual: cloud.len(),
        });
    }

    let alpha = match params.alpha {
        Some(alpha) => alpha,
        None => estimate_alpha(cloud, params.neighbor_k)?,
    };
    debug!(alpha, points = cloud.len(), "extracting alpha surface");

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, p) in cloud.points.iter().enumerate() {
        tree.add(&[p.x, p.y, p.z], i as u64);
    }

    // Two vertices of a triangle with circumradius <= alpha are at most
    // 2*alpha apart.
    let reach_sq = (2.0 * alpha) * (2.0 * alpha);
    let alpha_sq = alpha * alpha;

    let mut faces: HashSet<[u32; 3]> = HashSet::new();

    for (i, p) in cloud.points.iter().enumerate() {
        let mut neighbors: Vec<usize> = tree
            .within::<SquaredEuclidean>(&[p.x, p.y, p.z], reach_sq)
            .into_iter()
            .map(|n| {
                #[allow(clippy::cast_possible_truncation)]
                let idx = n.item as usize;
                idx
            })
            .filter(|&idx| idx > i)
            .collect();
        neighbors.sort_unstable();

        for (jj, &j) in neighbors.iter().enumerate() {
            for &k in &neighbors[jj + 1..] {
                let Some((center_a, center_b)) = alpha_ball_centers(
                    &cloud.points[i],
                    &cloud.points[j],
                    &cloud.points[k],
                    alpha,
                ) else {
                    continue;
                };

                let exclude = [i, j, k];
                if is_empty_ball(cloud, &tree, &center_a, alpha_sq, &exclude)
                    || is_empty_ball(cloud, &tree, &center_b, alpha_sq, &exclude)
                {
                    #[allow(clippy::cast_possible_truncation)]
                    faces.insert([i as u32, j as u32, k as u32]);
                }
            }
        }
    }

    if faces.is_empty() {
        return Err(SurfaceError::ExtractionFailed {
            reason: format!("no triangle has circumradius within alpha {alpha}"),
        });
    }

    let mut face_list: Vec<[u32; 3]> = faces.into_iter().collect();
    face_list.sort_unstable();

    info!(faces = face_list.len(), "alpha surface extracted");
    Ok(TriangleMesh::from_parts(cloud.points.clone(), face_list))
}

/// Alpha from average point spacing, slightly above it so well-sampled
/// neighborhoods connect.
fn estimate_alpha(cloud: &PointCloud, k: usize) -> SurfaceResult<f64> {
    cloud
        .average_spacing(k.max(1))
        .map(|spacing| spacing * 1.5)
        .ok_or_else(|| SurfaceError::ExtractionFailed {
            reason: "could not estimate point spacing".to_string(),
        })
}

/// Centers of the two balls of radius `alpha` through the triangle's
/// vertices, one on each side. `None` if the triangle is degenerate or
/// its circumradius exceeds `alpha`.
fn alpha_ball_centers(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    alpha: f64,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let normal = e1.cross(&e2);
    let normal_len = normal.norm();
    if normal_len < 1e-12 {
        return None;
    }
    let unit_normal = normal / normal_len;

    // Circumcenter via barycentric weights.
    let alpha_w = (p1 - p2).norm_squared() * (p0 - p1).dot(&(p0 - p2));
    let beta_w = (p0 - p2).norm_squared() * (p1 - p0).dot(&(p1 - p2));
    let gamma_w = (p0 - p1).norm_squared() * (p2 - p0).dot(&(p2 - p1));
    let denom = alpha_w + beta_w + gamma_w;
    if denom.abs() < 1e-12 {
        return None;
    }

    let circumcenter = Point3::from(
        (alpha_w * p0.coords + beta_w * p1.coords + gamma_w * p2.coords) / denom,
    );

    let circumradius_sq = (p0 - circumcenter).norm_squared();
    let h_sq = alpha.mul_add(alpha, -circumradius_sq);
    if h_sq < 0.0 {
        return None;
    }
    let offset: Vector3<f64> = unit_normal * h_sq.sqrt();

    Some((
        Point3::from(circumcenter.coords + offset),
        Point3::from(circumcenter.coords - offset),
    ))
}

/// Whether the ball contains no cloud point other than the excluded ones.
fn is_empty_ball(
    cloud: &PointCloud,
    tree: &KdTree<f64, 3>,
    center: &Point3<f64>,
    radius_sq: f64,
    exclude: &[usize; 3],
) -> bool {
    let candidates =
        tree.within::<SquaredEuclidean>(&[center.x, center.y, center.z], radius_sq * 1.01);

    for candidate in candidates {
        #[allow(clippy::cast_possible_truncation)]
        let idx = candidate.item as usize;
        if exclude.contains(&idx) {
            continue;
        }
        let dist_sq = (cloud.points[idx] - center).norm_squared();
        if dist_sq < radius_sq - BALL_TOLERANCE {
            return false;
        }
    }

    true
}
