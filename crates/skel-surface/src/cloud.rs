//! Point cloud container.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Point3;

/// An unordered set of 3D points.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    /// Point positions.
    pub points: Vec<Point3<f64>>,
}

impl PointCloud {
    /// Create an empty point cloud.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud from positions.
    #[must_use]
    pub fn from_positions(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Average distance to the `k` nearest neighbors across all points.
    ///
    /// Used to derive a density-relative alpha radius when none is given.
    /// Returns `None` for clouds with fewer than two points.
    #[must_use]
    pub fn average_spacing(&self, k: usize) -> Option<f64> {
        if self.points.len() < 2 || k == 0 {
            return None;
        }

        let mut tree: KdTree<f64, 3> = KdTree::new();
        for (i, p) in self.points.iter().enumerate() {
            tree.add(&[p.x, p.y, p.z], i as u64);
        }

        let k_query = k.min(self.points.len() - 1);
        let mut total = 0.0;
        let mut count = 0u32;

        for p in &self.points {
            let neighbors = tree.nearest_n::<SquaredEuclidean>(&[p.x, p.y, p.z], k_query + 1);
            // First neighbor is the point itself.
            for neighbor in neighbors.iter().skip(1) {
                total += neighbor.distance.sqrt();
                count += 1;
            }
        }

        (count > 0).then(|| total / f64::from(count))
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
