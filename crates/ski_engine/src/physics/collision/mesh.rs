//! Collision mesh representations
//!
//! Triangles are stored once in MODEL SPACE and transformed on demand by the
//! model matrix of whichever instance is being tested, so one mesh can back
//! any number of placed copies.

use thiserror::Error;

use super::primitives::{BoundingSphere, Ray, Triangle};
use crate::foundation::math::{transform_point, Mat4, Mat4Ext, Vec3};

/// Errors raised while building or loading a collision mesh
#[derive(Error, Debug)]
pub enum MeshError {
    /// An index referenced a vertex that does not exist
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Number of vertices available
        vertex_count: usize,
    },

    /// Index count is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// Mesh source file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Mesh source file is malformed
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
}

/// A single contact produced by a mesh query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshContact {
    /// Contact point in world space
    pub point: Vec3,
    /// Face normal in world space, turned to face the query. NOT normalized.
    pub normal: Vec3,
    /// Distance from the query origin (sphere center or ray origin)
    pub distance: f32,
}

/// A triangle soup in model space with a local bounding sphere
#[derive(Debug, Clone, Default)]
pub struct CollisionMesh {
    triangles: Vec<Triangle>,
    local_center: Vec3,
    local_radius: f32,
}

impl CollisionMesh {
    /// Build a mesh from model-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut min = Vec3::repeat(f32::MAX);
        let mut max = Vec3::repeat(f32::MIN);
        for tri in &triangles {
            for v in [tri.v0, tri.v1, tri.v2] {
                min = min.inf(&v);
                max = max.sup(&v);
            }
        }

        if triangles.is_empty() {
            return Self::default();
        }

        let local_center = (min + max) * 0.5;
        let local_radius = triangles
            .iter()
            .flat_map(|tri| [tri.v0, tri.v1, tri.v2])
            .map(|v| (v - local_center).norm())
            .fold(0.0f32, f32::max);

        Self {
            triangles,
            local_center,
            local_radius,
        }
    }

    /// Build a mesh from model-space vertices and a triangle index list
    pub fn from_indexed(vertices: &[Vec3], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(indices.len()));
        }

        let vertex = |index: u32| {
            vertices
                .get(index as usize)
                .copied()
                .ok_or(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                })
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|chunk| Ok(Triangle::new(vertex(chunk[0])?, vertex(chunk[1])?, vertex(chunk[2])?)))
            .collect::<Result<Vec<_>, MeshError>>()?;

        Ok(Self::from_triangles(triangles))
    }

    /// Flat square on the XZ plane at y = 0, centered on the origin, split
    /// into `subdivisions` cells per side
    pub fn plane(half_extent: f32, subdivisions: u32) -> Self {
        let cells = subdivisions.max(1);
        let step = 2.0 * half_extent / cells as f32;
        let corner = |i: u32, j: u32| {
            Vec3::new(-half_extent + i as f32 * step, 0.0, -half_extent + j as f32 * step)
        };

        let mut triangles = Vec::with_capacity((cells * cells * 2) as usize);
        for i in 0..cells {
            for j in 0..cells {
                let (a, b, c, d) = (corner(i, j), corner(i, j + 1), corner(i + 1, j + 1), corner(i + 1, j));
                triangles.push(Triangle::new(a, b, c));
                triangles.push(Triangle::new(a, c, d));
            }
        }
        Self::from_triangles(triangles)
    }

    /// Inclined strip starting at the origin and descending along +Z.
    /// `angle` is the incline in radians; the strip spans `half_width` to
    /// either side of the X origin and `length` along the surface.
    pub fn slope(half_width: f32, length: f32, angle: f32) -> Self {
        let end = Vec3::new(0.0, -length * angle.sin(), length * angle.cos());
        let left = Vec3::new(-half_width, 0.0, 0.0);
        let right = Vec3::new(half_width, 0.0, 0.0);
        Self::from_triangles(vec![
            Triangle::new(left, left + end, right + end),
            Triangle::new(left, right + end, right),
        ])
    }

    /// Vertical quad in the XY plane facing +Z, standing on y = 0
    pub fn wall(half_width: f32, height: f32) -> Self {
        let a = Vec3::new(-half_width, 0.0, 0.0);
        let b = Vec3::new(half_width, 0.0, 0.0);
        let c = Vec3::new(half_width, height, 0.0);
        let d = Vec3::new(-half_width, height, 0.0);
        Self::from_triangles(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)])
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let corners = [
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        #[rustfmt::skip]
        let indices: [u32; 36] = [
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
            3, 7, 6, 3, 6, 2, // +Y
            0, 1, 5, 0, 5, 4, // -Y
        ];
        let triangles = indices
            .chunks_exact(3)
            .map(|c| Triangle::new(corners[c[0] as usize], corners[c[1] as usize], corners[c[2] as usize]))
            .collect();
        Self::from_triangles(triangles)
    }

    /// Model-space triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding sphere of one placed instance
    pub fn world_bounds(&self, model: &Mat4) -> BoundingSphere {
        BoundingSphere::new(
            transform_point(model, &self.local_center),
            self.local_radius * model.max_scale(),
        )
    }

    fn world_triangles<'a>(&'a self, model: &'a Mat4) -> impl Iterator<Item = Triangle> + 'a {
        self.triangles.iter().map(move |tri| {
            Triangle::new(
                transform_point(model, &tri.v0),
                transform_point(model, &tri.v1),
                transform_point(model, &tri.v2),
            )
        })
    }

    /// Closest contact between a world-space sphere and this mesh placed by
    /// `model`. Degenerate triangles are skipped.
    pub fn test_sphere_collision(&self, model: &Mat4, center: Vec3, radius: f32) -> Option<MeshContact> {
        if self.triangles.is_empty() || radius < 0.0 {
            return None;
        }
        if !self.world_bounds(model).intersects(&BoundingSphere::new(center, radius)) {
            return None;
        }

        let radius_sq = radius * radius;
        let mut best: Option<MeshContact> = None;

        for tri in self.world_triangles(model) {
            if tri.is_degenerate() {
                continue;
            }

            let point = tri.closest_point(center);
            let offset = center - point;
            let distance_sq = offset.norm_squared();
            if distance_sq > radius_sq {
                continue;
            }

            let distance = distance_sq.sqrt();
            if best.map_or(true, |b| distance < b.distance) {
                let mut normal = tri.face_normal();
                if normal.dot(&offset) < 0.0 {
                    normal = -normal;
                }
                best = Some(MeshContact { point, normal, distance });
            }
        }

        best
    }

    /// Nearest hit of a world-space ray within `max_distance`
    pub fn test_ray_collision(
        &self,
        model: &Mat4,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<MeshContact> {
        let ray = Ray::new(origin, direction)?;
        if self.triangles.is_empty() || !self.world_bounds(model).intersects_segment(&ray, max_distance) {
            return None;
        }

        let mut best: Option<MeshContact> = None;

        for tri in self.world_triangles(model) {
            if tri.is_degenerate() {
                continue;
            }
            let Some(t) = tri.intersect_ray(&ray) else {
                continue;
            };
            if t > max_distance || best.map_or(false, |b| t >= b.distance) {
                continue;
            }

            let mut normal = tri.face_normal();
            if normal.dot(&ray.direction) > 0.0 {
                normal = -normal;
            }
            best = Some(MeshContact {
                point: ray.point_at(t),
                normal,
                distance: t,
            });
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_indexed_mesh_rejects_bad_index() {
        let vertices = [Vec3::zeros(), Vec3::x(), Vec3::z()];
        let err = CollisionMesh::from_indexed(&vertices, &[0, 1, 5]).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 5, vertex_count: 3 }));

        let err = CollisionMesh::from_indexed(&vertices, &[0, 1]).unwrap_err();
        assert!(matches!(err, MeshError::IncompleteTriangle(2)));
    }

    #[test]
    fn test_sphere_resting_on_plane() {
        let plane = CollisionMesh::plane(10.0, 1);
        let contact = plane
            .test_sphere_collision(&Mat4::identity(), Vec3::new(1.0, 0.25, 2.0), 0.3)
            .unwrap();

        assert_relative_eq!(contact.point, Vec3::new(1.0, 0.0, 2.0), epsilon = 1e-5);
        assert_relative_eq!(contact.distance, 0.25, epsilon = 1e-5);
        assert!(contact.normal.normalize().y > 0.99);
    }

    #[test]
    fn test_sphere_in_empty_space_misses() {
        let plane = CollisionMesh::plane(10.0, 1);
        assert!(plane
            .test_sphere_collision(&Mat4::identity(), Vec3::new(0.0, 5.0, 0.0), 0.3)
            .is_none());
        // Far outside the bounding sphere
        assert!(plane
            .test_sphere_collision(&Mat4::identity(), Vec3::new(500.0, 0.0, 0.0), 0.3)
            .is_none());
    }

    #[test]
    fn test_normal_faces_query_from_below() {
        let plane = CollisionMesh::plane(10.0, 1);
        let contact = plane
            .test_sphere_collision(&Mat4::identity(), Vec3::new(0.0, -0.2, 0.0), 0.3)
            .unwrap();
        assert!(contact.normal.y < 0.0);
    }

    #[test]
    fn test_ray_hits_translated_instance() {
        let plane = CollisionMesh::plane(5.0, 4);
        let model = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));

        let contact = plane
            .test_ray_collision(&model, Vec3::new(1.0, 10.0, 0.7), -Vec3::y(), 100.0)
            .unwrap();
        assert_relative_eq!(contact.point, Vec3::new(1.0, 2.0, 0.7), epsilon = 1e-4);
        assert_relative_eq!(contact.distance, 8.0, epsilon = 1e-4);
        assert!(contact.normal.normalize().y > 0.99);

        assert!(plane
            .test_ray_collision(&model, Vec3::new(1.0, 10.0, 0.7), -Vec3::y(), 5.0)
            .is_none());
    }

    #[test]
    fn test_ray_reports_nearest_face_of_cuboid() {
        let cube = CollisionMesh::cuboid(Vec3::new(1.0, 1.0, 1.0));
        let contact = cube
            .test_ray_collision(&Mat4::identity(), Vec3::new(-5.0, 0.2, 0.1), Vec3::x(), 50.0)
            .unwrap();
        assert_relative_eq!(contact.distance, 4.0, epsilon = 1e-4);
        assert!(contact.normal.normalize().x < -0.99);
    }

    #[test]
    fn test_slope_normal_tilts_downhill() {
        let angle = 20.0f32.to_radians();
        let slope = CollisionMesh::slope(5.0, 40.0, angle);
        let contact = slope
            .test_ray_collision(&Mat4::identity(), Vec3::new(0.0, 10.0, 10.0), -Vec3::y(), 50.0)
            .unwrap();
        let normal = contact.normal.normalize();

        assert_relative_eq!(normal.y, angle.cos(), epsilon = 1e-4);
        assert!(normal.z > 0.0);
        assert_relative_eq!(contact.point.y, -10.0 * angle.tan(), epsilon = 1e-3);
    }

    #[test]
    fn test_wall_contact_from_front() {
        let wall = CollisionMesh::wall(5.0, 3.0);
        let contact = wall
            .test_sphere_collision(&Mat4::identity(), Vec3::new(0.0, 1.0, 0.2), 0.3)
            .unwrap();
        assert!(contact.normal.normalize().z > 0.99);
        assert_relative_eq!(contact.distance, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_scaled_bounds_grow_with_model() {
        let cube = CollisionMesh::cuboid(Vec3::new(1.0, 1.0, 1.0));
        let model = Mat4::new_scaling(3.0);
        let bounds = cube.world_bounds(&model);
        assert_relative_eq!(bounds.radius, 3.0 * 3.0f32.sqrt(), epsilon = 1e-4);
        assert_relative_eq!(model.max_scale(), 3.0, epsilon = 1e-5);
    }
}
