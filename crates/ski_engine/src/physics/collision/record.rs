//! Collision records produced by collider probes and world queries

use crate::foundation::math::{safe_normalize, world_up, Vec3};
use crate::physics::collider::SurfaceTags;
use crate::scene::NodeId;

/// Result of one geometric test
///
/// Built fresh for every query and consumed within the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRecord {
    /// Contact point in world space
    pub point: Vec3,
    /// Contact normal, unit length and facing the query
    pub normal: Vec3,
    /// Distance from the query origin
    pub distance: f32,
    /// Whether anything was hit
    pub collision: bool,
    /// Collider node that produced the contact
    pub collider: Option<NodeId>,
    /// Logical entity owning the collider
    pub entity: Option<NodeId>,
    /// Surface tags of the collider, copied for the response code
    pub surface: SurfaceTags,
}

impl CollisionRecord {
    /// A record that hit nothing, with `distance` set to the search limit
    pub fn miss(max_distance: f32) -> Self {
        Self {
            point: Vec3::zeros(),
            normal: world_up(),
            distance: max_distance,
            collision: false,
            collider: None,
            entity: None,
            surface: SurfaceTags::empty(),
        }
    }

    /// A hit record; the normal is normalized here, degenerate normals become world up
    pub fn hit(point: Vec3, normal: Vec3, distance: f32, collider: NodeId, surface: SurfaceTags) -> Self {
        Self {
            point,
            normal: safe_normalize(normal, world_up()),
            distance,
            collision: true,
            collider: Some(collider),
            entity: Some(collider),
            surface,
        }
    }

    /// Dot product of the normal with world up
    pub fn up_dot(&self) -> f32 {
        self.normal.dot(&world_up())
    }
}

impl Default for CollisionRecord {
    fn default() -> Self {
        Self::miss(0.0)
    }
}

/// Contacts accumulated by one scene-wide scan
#[derive(Debug, Clone, Default)]
pub struct ContactSet {
    /// Sphere-probe contacts (walls, bodies, nearby ground)
    pub collisions: Vec<CollisionRecord>,
    /// Downward-ray contacts
    pub ground_collisions: Vec<CollisionRecord>,
}

impl ContactSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// True when neither list holds a contact
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty() && self.ground_collisions.is_empty()
    }

    /// Total number of contacts
    pub fn len(&self) -> usize {
        self.collisions.len() + self.ground_collisions.len()
    }
}
