//! STL (Stereolithography) export.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector3;
use skel_types::TriangleMesh;
use tracing::info;

use crate::error::{ExportError, ExportResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Save a mesh as binary STL.
///
/// # Errors
///
/// Returns [`ExportError::EmptyMesh`] for a mesh with no faces, or an
/// I/O error from the filesystem.
///
/// # Example
///
/// ```no_run
/// use skel_io::save_stl;
/// use skel_types::unit_cube;
///
/// save_stl(&unit_cube(), "cube.stl").unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> ExportResult<()> {
    if mesh.faces.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header = [0u8; HEADER_SIZE];
    let tag = b"skel-io binary STL";
    header[..tag.len()].copy_from_slice(tag);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    let face_count = mesh.faces.len() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for triangle in mesh.triangles() {
        let normal = triangle.normal().unwrap_or_else(Vector3::zeros);

        write_vector(&mut writer, normal.x, normal.y, normal.z)?;
        write_vector(&mut writer, triangle.v0.x, triangle.v0.y, triangle.v0.z)?;
        write_vector(&mut writer, triangle.v1.x, triangle.v1.y, triangle.v1.z)?;
        write_vector(&mut writer, triangle.v2.x, triangle.v2.y, triangle.v2.z)?;
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    info!(faces = mesh.faces.len(), path = %path.display(), "saved binary STL");
    Ok(())
}

/// Save a mesh as ASCII STL.
///
/// Larger than the binary form but diffable; useful for fixtures.
///
/// # Errors
///
/// Returns [`ExportError::EmptyMesh`] for a mesh with no faces, or an
/// I/O error from the filesystem.
pub fn save_stl_ascii<P: AsRef<Path>>(
    mesh: &TriangleMesh,
    path: P,
    name: &str,
) -> ExportResult<()> {
    if mesh.faces.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "solid {name}")?;
    for triangle in mesh.triangles() {
        let normal = triangle.normal().unwrap_or_else(Vector3::zeros);

        writeln!(
            writer,
            "  facet normal {:e} {:e} {:e}",
            normal.x, normal.y, normal.z
        )?;
        writeln!(writer, "    outer loop")?;
        for v in [&triangle.v0, &triangle.v1, &triangle.v2] {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;

    writer.flush()?;
    info!(faces = mesh.faces.len(), path = %path.display(), "saved ASCII STL");
    Ok(())
}

fn write_vector<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> std::io::Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    for value in [x as f32, y as f32, z as f32] {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skel_types::unit_cube;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("skel_io_test_{}_{name}", std::process::id()))
    }

    #[test]
    fn binary_stl_has_exact_size() {
        let cube = unit_cube();
        let path = temp_path("cube.stl");
        save_stl(&cube, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // Header + count + 12 triangles of 50 bytes.
        assert_eq!(bytes.len(), 80 + 4 + 12 * 50);

        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count, 12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mesh = TriangleMesh::new();
        let path = temp_path("empty.stl");
        assert!(matches!(
            save_stl(&mesh, &path),
            Err(ExportError::EmptyMesh)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn ascii_stl_is_bracketed_by_solid() {
        let cube = unit_cube();
        let path = temp_path("cube_ascii.stl");
        save_stl_ascii(&cube, &path, "cube").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("solid cube"));
        assert!(text.trim_end().ends_with("endsolid cube"));
        assert_eq!(text.matches("facet normal").count(), 12);

        std::fs::remove_file(&path).ok();
    }
}
