//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision and slope
//! physics code, plus the handful of guarded vector helpers the physics
//! relies on. Model matrices are column-major: column 0 is the right axis,
//! column 1 the up axis, column 2 the front axis and column 3 the translation.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Squared length under which a vector is treated as degenerate.
pub const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// World up axis (+Y).
#[inline]
pub fn world_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// Normalize `v`, or return `fallback` when `v` is zero-length or not finite.
#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ || !len_sq.is_finite() {
        fallback
    } else {
        v / len_sq.sqrt()
    }
}

/// Mirror `v` across the plane with unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - n * (2.0 * v.dot(&n))
}

/// Remove the component of `v` along the unit normal `n`.
#[inline]
pub fn project_on_plane(v: Vec3, n: Vec3) -> Vec3 {
    v - n * v.dot(&n)
}

/// Transform a point by a model matrix.
#[inline]
pub fn transform_point(m: &Mat4, p: &Vec3) -> Vec3 {
    m.transform_point(&Point3::from(*p)).coords
}

/// Matrix helpers for column-major model matrices.
pub trait Mat4Ext {
    /// Build a model matrix from an orthonormal basis and a translation
    fn from_basis(right: Vec3, up: Vec3, front: Vec3, translation: Vec3) -> Mat4;

    /// Rotation around the world Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Translation stored in the matrix
    fn translation(&self) -> Vec3;

    /// Overwrite the translation, keeping the rotation/scale block
    fn set_translation(&mut self, translation: Vec3);

    /// Front (local +Z) axis
    fn front_vector(&self) -> Vec3;

    /// Right (local +X) axis
    fn right_vector(&self) -> Vec3;

    /// Up (local +Y) axis
    fn up_vector(&self) -> Vec3;

    /// Largest axis scale, used to scale model-space bounding radii
    fn max_scale(&self) -> f32;
}

impl Mat4Ext for Mat4 {
    fn from_basis(right: Vec3, up: Vec3, front: Vec3, translation: Vec3) -> Mat4 {
        Mat4::new(
            right.x, up.x, front.x, translation.x,
            right.y, up.y, front.y, translation.y,
            right.z, up.z, front.z, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn translation(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }

    fn set_translation(&mut self, translation: Vec3) {
        self.m14 = translation.x;
        self.m24 = translation.y;
        self.m34 = translation.z;
    }

    fn front_vector(&self) -> Vec3 {
        Vec3::new(self.m13, self.m23, self.m33)
    }

    fn right_vector(&self) -> Vec3 {
        Vec3::new(self.m11, self.m21, self.m31)
    }

    fn up_vector(&self) -> Vec3 {
        Vec3::new(self.m12, self.m22, self.m32)
    }

    fn max_scale(&self) -> f32 {
        self.right_vector()
            .norm()
            .max(self.up_vector().norm())
            .max(self.front_vector().norm())
    }
}

/// Build an orthonormal (right, up, front) basis whose up axis is `up` and
/// whose front axis is `front` projected onto the plane orthogonal to `up`.
///
/// Degenerate inputs fall back to world up and a front axis perpendicular
/// to it, so the result is always a valid rotation.
pub fn orthonormal_basis(up: Vec3, front: Vec3) -> (Vec3, Vec3, Vec3) {
    let up = safe_normalize(up, world_up());
    let mut front_on_plane = project_on_plane(front, up);
    if front_on_plane.norm_squared() <= DEGENERATE_LENGTH_SQ {
        // Front is parallel to up: pick any axis perpendicular to up.
        let helper = if up.x.abs() < 0.9 { Vec3::x() } else { Vec3::z() };
        front_on_plane = project_on_plane(helper, up);
    }
    let front = safe_normalize(front_on_plane, Vec3::z());
    let right = safe_normalize(up.cross(&front), Vec3::x());
    (right, up, front)
}

/// Heading direction on the ground plane for a yaw angle (yaw 0 faces +Z).
#[inline]
pub fn heading_front(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Math utility functions
pub mod utils {
    /// Move `current` toward `target` by at most `max_delta`
    pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
        if current < target {
            (current + max_delta).min(target)
        } else {
            (current - max_delta).max(target)
        }
    }
}
