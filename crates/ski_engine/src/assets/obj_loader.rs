//! OBJ file loader for collision geometry
//!
//! Only positions (`v`) and faces (`f`) matter for collision; normals, texture
//! coordinates and material statements are skipped. Polygons are
//! fan-triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use super::MeshSource;
use crate::foundation::math::Vec3;
use crate::physics::collision::{CollisionMesh, MeshError};

/// Loads collision meshes from Wavefront OBJ files under a root directory
#[derive(Debug, Clone)]
pub struct ObjMeshSource {
    root: PathBuf,
}

impl ObjMeshSource {
    /// Resolve mesh paths relative to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory mesh paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MeshSource for ObjMeshSource {
    fn load(&self, path: &str) -> Result<CollisionMesh, MeshError> {
        let file = File::open(self.root.join(path))?;
        parse_obj(BufReader::new(file))
    }
}

/// Parse OBJ text into a collision mesh
pub fn parse_obj(reader: impl Read) -> Result<CollisionMesh, MeshError> {
    let reader = BufReader::new(reader);
    let mut positions: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_index + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let coords = parts
                    .take(3)
                    .map(|p| p.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| MeshError::Parse {
                        line: line_number,
                        message: format!("invalid vertex: {e}"),
                    })?;
                if coords.len() != 3 {
                    return Err(MeshError::Parse {
                        line: line_number,
                        message: "vertex needs three coordinates".to_string(),
                    });
                }
                positions.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let face = parts
                    .map(|p| resolve_index(p, positions.len(), line_number))
                    .collect::<Result<Vec<_>, _>>()?;
                if face.len() < 3 {
                    return Err(MeshError::Parse {
                        line: line_number,
                        message: format!("face has {} vertices", face.len()),
                    });
                }
                for i in 1..face.len() - 1 {
                    indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    CollisionMesh::from_indexed(&positions, &indices)
}

/// Convert a face token (`7`, `7/1`, `7/1/3`, `-1`) into a 0-based index
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32, MeshError> {
    let position = token.split('/').next().unwrap_or_default();
    let raw: i64 = position.parse().map_err(|_| MeshError::Parse {
        line,
        message: format!("invalid face index '{token}'"),
    })?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertex_count as i64 + r),
    };

    resolved
        .filter(|&i| i >= 0)
        .and_then(|i| u32::try_from(i).ok())
        .ok_or(MeshError::Parse {
            line,
            message: format!("face index '{token}' out of range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use std::io::Write;

    const QUAD: &str = "\
# unit quad
v -1 0 -1
v -1 0 1
v 1 0 1
v 1 0 -1
vn 0 1 0
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);

        let hit = mesh.test_ray_collision(&Mat4::identity(), Vec3::new(0.2, 5.0, 0.3), -Vec3::y(), 10.0);
        assert!(hit.is_some());
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 0 1\nf -3 -2 -1\n".as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_out_of_range_face_is_an_error() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2 9\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 8, .. }));
    }

    #[test]
    fn test_bad_vertex_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::create(dir.path().join("floor.obj")).unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let source = ObjMeshSource::new(dir.path());
        assert_eq!(source.load("floor.obj").unwrap().triangle_count(), 2);
        assert!(matches!(source.load("missing.obj"), Err(MeshError::Io(_))));
    }
}
