//! Point sampling of a traced skeleton.
//!
//! Every node contributes a sphere shell scaled by its radius; every link
//! contributes rings of a tube whose radius interpolates between its
//! endpoints. The union of these samples is the point cloud the alpha
//! shape is extracted from.

use std::collections::VecDeque;

use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use skel_types::{Link, Node, NodeId};
use tracing::debug;

/// Parameters for [`SkeletonSampler`].
#[derive(Debug, Clone, Copy)]
pub struct SampleParams {
    /// Points per ring, for both sphere bands and tube rings.
    pub ring_segments: usize,
    /// Latitude bands per node sphere (excluding the poles).
    pub latitude_bands: usize,
    /// Spacing between tube rings along a link, as a fraction of the mean
    /// endpoint radius.
    pub axial_step: f64,
}

impl Default for SampleParams {
    /// 12 segments per ring, 6 latitude bands, rings every half radius.
    fn default() -> Self {
        Self {
            ring_segments: 12,
            latitude_bands: 6,
            axial_step: 0.5,
        }
    }
}

/// Lazy point sampler over a skeleton's nodes and links.
///
/// Yields sphere-shell points for each node, then tube-ring points for
/// each link. Links referencing unknown node ids are skipped.
///
/// # Example
///
/// ```
/// use skel_surface::{PointCloud, SampleParams, SkeletonSampler};
/// use skel_types::{Node, Point3};
///
/// let nodes = vec![Node::new(1, Point3::new(0.0, 0.0, 0.0), 2.0)];
/// let cloud: PointCloud = SkeletonSampler::new(&nodes, &[], SampleParams::default()).collect();
/// assert!(!cloud.is_empty());
/// ```
pub struct SkeletonSampler<'a> {
    nodes: &'a [Node],
    links: &'a [Link],
    params: SampleParams,
    index: HashMap<NodeId, usize>,
    node_cursor: usize,
    link_cursor: usize,
    buffer: VecDeque<Point3<f64>>,
}

impl<'a> SkeletonSampler<'a> {
    /// Create a sampler over the given nodes and links.
    #[must_use]
    pub fn new(nodes: &'a [Node], links: &'a [Link], params: SampleParams) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();

        Self {
            nodes,
            links,
            params,
            index,
            node_cursor: 0,
            link_cursor: 0,
            buffer: VecDeque::new(),
        }
    }

    fn fill_from_node(&mut self, node: &Node) {
        let center = node.position;
        let r = node.radius;

        if r <= 0.0 {
            self.buffer.push_back(center);
            return;
        }

        // Poles.
        self.buffer.push_back(center + Vector3::new(0.0, 0.0, r));
        self.buffer.push_back(center + Vector3::new(0.0, 0.0, -r));

        let bands = self.params.latitude_bands.max(1);
        for band in 1..bands {
            #[allow(clippy::cast_precision_loss)]
            let phi = std::f64::consts::PI * band as f64 / bands as f64;
            let ring_radius = r * phi.sin();
            let z = r * phi.cos();
            push_ring(
                &mut self.buffer,
                &(center + Vector3::new(0.0, 0.0, z)),
                &Vector3::z(),
                ring_radius,
                self.params.ring_segments,
            );
        }
    }

    fn fill_from_link(&mut self, link: Link) {
        let (Some(&ia), Some(&ib)) = (self.index.get(&link.a), self.index.get(&link.b)) else {
            debug!(a = link.a, b = link.b, "link references unknown node; skipped");
            return;
        };

        let from = &self.nodes[ia];
        let to = &self.nodes[ib];
        let axis = to.position - from.position;
        let length = axis.norm();
        if length < f64::EPSILON {
            return;
        }
        let direction = axis / length;

        let mean_radius = ((from.radius + to.radius) / 2.0).max(f64::EPSILON);
        let step = (self.params.axial_step * mean_radius).max(f64::EPSILON);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rings = ((length / step).ceil() as usize).max(1);

        // Endpoints are covered by the node spheres.
        for s in 1..rings {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 / rings as f64;
            let center = from.position + axis * t;
            let radius = from.radius + (to.radius - from.radius) * t;
            push_ring(
                &mut self.buffer,
                &center,
                &direction,
                radius,
                self.params.ring_segments,
            );
        }
    }

    fn refill(&mut self) {
        while self.buffer.is_empty() {
            if self.node_cursor < self.nodes.len() {
                let node = self.nodes[self.node_cursor].clone();
                self.node_cursor += 1;
                self.fill_from_node(&node);
            } else if self.link_cursor < self.links.len() {
                let link = self.links[self.link_cursor];
                self.link_cursor += 1;
                self.fill_from_link(link);
            } else {
                return;
            }
        }
    }
}

impl Iterator for SkeletonSampler<'_> {
    type Item = Point3<f64>;

    fn next(&mut self) -> Option<Point3<f64>> {
        if self.buffer.is_empty() {
            self.refill();
        }
        self.buffer.pop_front()
    }
}

/// Push a circle of points around `center` in the plane normal to `axis`.
fn push_ring(
    buffer: &mut VecDeque<Point3<f64>>,
    center: &Point3<f64>,
    axis: &Vector3<f64>,
    radius: f64,
    segments: usize,
) {
    if radius <= 0.0 {
        buffer.push_back(*center);
        return;
    }

    let (u, v) = plane_basis(axis);
    let segments = segments.max(3);
    for i in 0..segments {
        #[allow(clippy::cast_precision_loss)]
        let angle = std::f64::consts::TAU * i as f64 / segments as f64;
        buffer.push_back(center + (u * angle.cos() + v * angle.sin()) * radius);
    }
}

/// Two unit vectors spanning the plane perpendicular to `axis`.
fn plane_basis(axis: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let reference = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = axis.cross(&reference).normalize();
    let v = axis.cross(&u).normalize();
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, x: f64, radius: f64) -> Node {
        Node::new(id, Point3::new(x, 0.0, 0.0), radius)
    }

    #[test]
    fn lone_node_samples_a_sphere_shell() {
        let nodes = vec![node(1, 0.0, 2.0)];
        let params = SampleParams::default();
        let points: Vec<_> = SkeletonSampler::new(&nodes, &[], params).collect();

        // 2 poles + 5 interior bands of 12.
        assert_eq!(points.len(), 2 + 5 * 12);
        for p in &points {
            let dist = (p - Point3::new(0.0, 0.0, 0.0)).norm();
            assert!((dist - 2.0).abs() < 1e-9, "point off the shell: {dist}");
        }
    }

    #[test]
    fn zero_radius_node_yields_its_center() {
        let nodes = vec![node(7, 3.0, 0.0)];
        let points: Vec<_> =
            SkeletonSampler::new(&nodes, &[], SampleParams::default()).collect();
        assert_eq!(points.len(), 1);
        assert!((points[0].x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn link_fills_the_gap_between_nodes() {
        let nodes = vec![node(1, 0.0, 1.0), node(2, 10.0, 1.0)];
        let links = vec![Link::new(1, 2)];
        let points: Vec<_> =
            SkeletonSampler::new(&nodes, &links, SampleParams::default()).collect();

        // Some samples must land strictly between the spheres.
        let interior = points
            .iter()
            .filter(|p| p.x > 2.0 && p.x < 8.0)
            .count();
        assert!(interior > 0);

        // Tube samples sit on the interpolated radius.
        for p in points.iter().filter(|p| p.x > 1.5 && p.x < 8.5) {
            let ring_dist = (p.y * p.y + p.z * p.z).sqrt();
            assert!((ring_dist - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn dangling_link_is_skipped() {
        let nodes = vec![node(1, 0.0, 1.0)];
        let links = vec![Link::new(1, 99)];
        let with_link: Vec<_> =
            SkeletonSampler::new(&nodes, &links, SampleParams::default()).collect();
        let without: Vec<_> =
            SkeletonSampler::new(&nodes, &[], SampleParams::default()).collect();
        assert_eq!(with_link.len(), without.len());
    }

    #[test]
    fn sampling_is_deterministic() {
        let nodes = vec![node(1, 0.0, 1.0), node(2, 4.0, 2.0)];
        let links = vec![Link::new(1, 2)];
        let a: Vec<_> = SkeletonSampler::new(&nodes, &links, SampleParams::default()).collect();
        let b: Vec<_> = SkeletonSampler::new(&nodes, &links, SampleParams::default()).collect();
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(&b) {
            assert!((p - q).norm() < 1e-15);
        }
    }
}
