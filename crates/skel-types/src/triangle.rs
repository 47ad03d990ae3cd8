//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Utility type for geometric calculations; stores actual positions
/// rather than mesh indices. Winding is counter-clockwise when viewed
/// from the front (normal points toward the viewer).
///
/// # Example
///
/// ```
/// use skel_types::Triangle;
/// use nalgebra::Point3;
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.normal().unwrap().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Triangle area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2).norm() * 0.5
    }

    /// Unit normal by the right-hand rule, or `None` for a degenerate
    /// triangle.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let n = e1.cross(&e2);
        let len = n.norm();
        if len < f64::EPSILON {
            None
        } else {
            Some(n / len)
        }
    }

    /// Centroid of the three vertices.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Circumradius, or `None` for a degenerate triangle.
    ///
    /// Used by the alpha-ball surface extraction to decide whether a
    /// candidate facet fits inside an alpha sphere.
    #[must_use]
    pub fn circumradius(&self) -> Option<f64> {
        let a = (self.v1 - self.v2).norm();
        let b = (self.v0 - self.v2).norm();
        let c = (self.v0 - self.v1).norm();
        let area = self.area();
        if area < f64::EPSILON {
            None
        } else {
            Some((a * b * c) / (4.0 * area))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn area_of_right_triangle() {
        assert!((right_triangle().area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn normal_points_up() {
        let n = right_triangle().normal().unwrap();
        assert!((n.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_has_no_normal() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert!(tri.normal().is_none());
        assert!(tri.circumradius().is_none());
    }

    #[test]
    fn circumradius_of_right_triangle() {
        // Hypotenuse is the diameter of the circumcircle.
        let r = right_triangle().circumradius().unwrap();
        assert!((r - (2.0_f64).sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_is_mean() {
        let c = right_triangle().centroid();
        assert!((c.x - 1.0 / 3.0).abs() < 1e-12);
        assert!((c.y - 1.0 / 3.0).abs() < 1e-12);
    }
}
