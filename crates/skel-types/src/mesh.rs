//! Indexed triangle mesh with mass properties.

use crate::Triangle;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately, with faces referencing
/// vertices by index. Faces use counter-clockwise winding when viewed
/// from outside, so normals point outward by the right-hand rule.
///
/// # Example
///
/// ```
/// use skel_types::TriangleMesh;
/// use nalgebra::Point3;
///
/// let mut mesh = TriangleMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array, `[v0, v1, v2]`
    /// with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Concrete triangle for a face index, or `None` if out of range.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).map(|&[i0, i1, i2]| {
            Triangle::new(
                self.vertices[i0 as usize],
                self.vertices[i1 as usize],
                self.vertices[i2 as usize],
            )
        })
    }

    /// Iterate over all faces as concrete triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| {
            Triangle::new(
                self.vertices[i0 as usize],
                self.vertices[i1 as usize],
                self.vertices[i2 as usize],
            )
        })
    }

    /// Signed volume via the divergence theorem.
    ///
    /// Sums the signed volumes of the tetrahedra formed by each face and
    /// the origin. Positive for a closed mesh with outward normals,
    /// negative for an inside-out mesh.
    ///
    /// The result is only meaningful for a closed (watertight) mesh; for
    /// an open mesh it is numerically arbitrary.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize];
            let v1 = &self.vertices[i1 as usize];
            let v2 = &self.vertices[i2 as usize];

            // (v0 · (v1 × v2)) / 6
            let cross = Vector3::new(
                v1.y.mul_add(v2.z, -(v1.z * v2.y)),
                v1.z.mul_add(v2.x, -(v1.x * v2.z)),
                v1.x.mul_add(v2.y, -(v1.y * v2.x)),
            );
            volume += v0.z.mul_add(cross.z, v0.x.mul_add(cross.x, v0.y * cross.y));
        }

        volume / 6.0
    }

    /// Absolute volume, `signed_volume().abs()`.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Whether the mesh appears inside-out (negative signed volume).
    #[inline]
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume() < 0.0
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Unweighted center of mass: the coordinate mean of all vertices.
    ///
    /// Vertices count equally regardless of how much surface references
    /// them. Returns `None` for a mesh with no vertices.
    #[must_use]
    pub fn center_of_mass(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }

        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);

        #[allow(clippy::cast_precision_loss)]
        Some(Point3::from(sum / self.vertices.len() as f64))
    }

    /// Flip all face normals by reversing winding order.
    pub fn flip_all_faces(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }
}

/// A unit cube from (0,0,0) to (1,1,1) with outward-facing normals.
///
/// Test fixture used throughout the workspace.
///
/// # Example
///
/// ```
/// use skel_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert!((cube.volume() - 1.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn unit_cube() -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(8, 12);

    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Point3::new(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Point3::new(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Point3::new(0.0, 1.0, 1.0)); // 7

    // Two triangles per face, CCW viewed from outside.
    mesh.faces.push([0, 2, 1]); // bottom
    mesh.faces.push([0, 3, 2]);
    mesh.faces.push([4, 5, 6]); // top
    mesh.faces.push([4, 6, 7]);
    mesh.faces.push([0, 1, 5]); // front
    mesh.faces.push([0, 5, 4]);
    mesh.faces.push([3, 7, 6]); // back
    mesh.faces.push([3, 6, 2]);
    mesh.faces.push([0, 4, 7]); // left
    mesh.faces.push([0, 7, 3]);
    mesh.faces.push([1, 2, 6]); // right
    mesh.faces.push([1, 6, 5]);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh() {
        let mesh = TriangleMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.center_of_mass().is_none());
    }

    #[test]
    fn unit_cube_volume() {
        let cube = unit_cube();
        let vol = cube.signed_volume();
        assert!((vol - 1.0).abs() < 1e-10, "expected 1.0, got {vol}");
    }

    #[test]
    fn unit_cube_surface_area() {
        let area = unit_cube().surface_area();
        assert!((area - 6.0).abs() < 1e-10, "expected 6.0, got {area}");
    }

    #[test]
    fn flipped_cube_is_inside_out() {
        let mut cube = unit_cube();
        assert!(!cube.is_inside_out());
        cube.flip_all_faces();
        assert!(cube.is_inside_out());
        assert!((cube.volume() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn center_of_mass_of_cube() {
        let com = unit_cube().center_of_mass().unwrap();
        assert!((com.x - 0.5).abs() < 1e-12);
        assert!((com.y - 0.5).abs() < 1e-12);
        assert!((com.z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn center_of_mass_is_vertex_mean_not_area_weighted() {
        // Two vertices only; the mean ignores that no face references them.
        let mesh = TriangleMesh::from_parts(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
            vec![],
        );
        let com = mesh.center_of_mass().unwrap();
        assert!((com.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_accessor() {
        let cube = unit_cube();
        assert!(cube.triangle(0).is_some());
        assert!(cube.triangle(12).is_none());
    }
}
