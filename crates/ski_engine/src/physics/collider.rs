//! Static colliders
//!
//! A collider pairs a cached mesh with one or more model transforms. Queries
//! are made on behalf of a character standing at `target`: ankle and head
//! spheres catch walls, a slightly lowered sphere catches nearby ground and a
//! downward ray from head height samples the floor.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionRecord, ContactSet, MeshContact};
use super::collision_layers::CollisionFilter;
use crate::assets::{MeshCache, MeshHandle};
use crate::foundation::math::{world_up, Mat4, Vec3};
use crate::scene::NodeId;

bitflags! {
    /// Gameplay behaviour attached to a collider's surface
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SurfaceTags: u32 {
        /// Ramp, driven over rather than bounced off
        const RAMP = 1 << 0;
        /// Jump platform, launches the player
        const JUMP = 1 << 1;
        /// Dashboard, speed impulse
        const BOOST = 1 << 2;
        /// Finish line
        const GOAL = 1 << 3;
        /// Stores a recovery position on contact
        const CHECKPOINT = 1 << 4;
        /// Surfaces exempt from the wall-bounce response
        const NO_BOUNCE = Self::RAMP.bits() | Self::JUMP.bits() | Self::BOOST.bits() | Self::GOAL.bits();
    }
}

impl Default for SurfaceTags {
    fn default() -> Self {
        Self::empty()
    }
}

impl SurfaceTags {
    /// Derive tags from name fragments of a mesh path (case-insensitive)
    pub fn from_mesh_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let mut tags = Self::empty();
        if name.contains("ramp") {
            tags |= Self::RAMP;
        }
        if name.contains("jump") {
            tags |= Self::JUMP;
        }
        if name.contains("dash") || name.contains("boost") {
            tags |= Self::BOOST;
        }
        if name.contains("goal") || name.contains("finish") {
            tags |= Self::GOAL;
        }
        if name.contains("checkpoint") {
            tags |= Self::CHECKPOINT;
        }
        tags
    }

    /// Whether a wall contact with this surface should bounce the player
    pub fn bounces(self) -> bool {
        !self.intersects(Self::NO_BOUNCE)
    }
}

/// Probe geometry used by [`Collider::get_collisions`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Radius of the ankle and head spheres
    pub ankle_radius: f32,
    /// Height of the head sphere and ray origin above the feet
    pub player_height: f32,
    /// Radius of the ground sphere
    pub ground_radius: f32,
    /// How far the ground sphere reaches below the feet
    pub ground_reach: f32,
    /// Extra ray length below the feet
    pub ground_ray_extra: f32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ankle_radius: 0.3,
            player_height: 1.8,
            ground_radius: 0.35,
            ground_reach: 0.05,
            ground_ray_extra: 0.3,
        }
    }
}

impl ProbeSettings {
    /// Length of the downward ground ray
    pub fn ground_ray_length(&self) -> f32 {
        self.player_height + self.ground_ray_extra
    }
}

/// A static mesh placed at one or more transforms
#[derive(Debug, Clone)]
pub struct Collider {
    mesh: MeshHandle,
    models: Vec<Mat4>,
    layer: CollisionFilter,
    is_static: bool,
    surface: SurfaceTags,
}

impl Collider {
    /// Single-instance collider
    pub fn new(mesh: MeshHandle, model: Mat4, layer: CollisionFilter) -> Self {
        Self::instanced(mesh, vec![model], layer)
    }

    /// Collider tested at every transform in `models`
    pub fn instanced(mesh: MeshHandle, models: Vec<Mat4>, layer: CollisionFilter) -> Self {
        Self {
            mesh,
            models,
            layer,
            is_static: true,
            surface: SurfaceTags::empty(),
        }
    }

    /// Attach surface tags
    pub fn with_surface(mut self, surface: SurfaceTags) -> Self {
        self.surface = surface;
        self
    }

    /// Cached mesh handle
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Model transforms, one per instance
    pub fn models(&self) -> &[Mat4] {
        &self.models
    }

    /// More than one transform
    pub fn is_instanced(&self) -> bool {
        self.models.len() > 1
    }

    /// Layer this collider sits on
    pub fn layer(&self) -> CollisionFilter {
        self.layer
    }

    /// Dynamic colliders are not supported; always true
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Surface behaviour tags
    pub fn surface(&self) -> SurfaceTags {
        self.surface
    }

    /// Whether a query with `filter` sees this collider
    pub fn participates(&self, filter: CollisionFilter) -> bool {
        self.layer.participates(filter)
    }

    /// Probe every instance around a character standing at `target` and
    /// append the contacts to `contacts`.
    ///
    /// `owner` is the scene node holding this collider. If the layer does not
    /// match `filter`, nothing is probed and `contacts` is left untouched.
    pub fn get_collisions(
        &self,
        owner: NodeId,
        meshes: &MeshCache,
        probes: &ProbeSettings,
        target: Vec3,
        filter: CollisionFilter,
        contacts: &mut ContactSet,
    ) {
        if !self.participates(filter) {
            return;
        }
        let Some(mesh) = meshes.get(self.mesh) else {
            log::trace!("Collider {:?} references an unloaded mesh", owner);
            return;
        };

        let up = world_up();
        let ankle = target + up * probes.ankle_radius;
        let head = target + up * probes.player_height;
        let ground = target + up * (probes.ground_radius - probes.ground_reach);

        let record = |c: MeshContact| {
            CollisionRecord::hit(c.point, c.normal, c.distance, owner, self.surface)
        };

        for model in &self.models {
            for center in [ankle, head] {
                if let Some(contact) = mesh.test_sphere_collision(model, center, probes.ankle_radius) {
                    contacts.collisions.push(record(contact));
                }
            }

            if let Some(contact) = mesh.test_sphere_collision(model, ground, probes.ground_radius) {
                contacts.collisions.push(record(contact));
            }

            if let Some(contact) = mesh.test_ray_collision(model, head, -up, probes.ground_ray_length()) {
                contacts.ground_collisions.push(record(contact));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::CollisionMesh;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn owner() -> NodeId {
        let mut keys: SlotMap<NodeId, ()> = SlotMap::with_key();
        keys.insert(())
    }

    fn floor(meshes: &mut MeshCache, layer: CollisionFilter) -> Collider {
        let handle = meshes.insert("floor", CollisionMesh::plane(20.0, 2));
        Collider::new(handle, Mat4::identity(), layer)
    }

    #[test]
    fn test_standing_on_floor_reports_ground() {
        let mut meshes = MeshCache::new();
        let collider = floor(&mut meshes, CollisionFilter::SCENARIO);
        let mut contacts = ContactSet::new();

        collider.get_collisions(
            owner(),
            &meshes,
            &ProbeSettings::default(),
            Vec3::new(1.0, 0.0, 1.5),
            CollisionFilter::ALL,
            &mut contacts,
        );

        assert_eq!(contacts.ground_collisions.len(), 1);
        let ground = contacts.ground_collisions[0];
        assert!(ground.collision);
        assert_relative_eq!(ground.point.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ground.normal, world_up(), epsilon = 1e-5);
        assert_relative_eq!(ground.distance, 1.8, epsilon = 1e-4);

        // Head sphere is clear, the lower spheres touch the floor
        assert!(!contacts.collisions.is_empty());
        assert!(contacts.collisions.iter().all(|c| c.up_dot() > 0.99));
    }

    #[test]
    fn test_non_matching_filter_skips_probes() {
        let mut meshes = MeshCache::new();
        let collider = floor(&mut meshes, CollisionFilter::WALL);
        let mut contacts = ContactSet::new();

        collider.get_collisions(
            owner(),
            &meshes,
            &ProbeSettings::default(),
            Vec3::zeros(),
            CollisionFilter::PLAYER,
            &mut contacts,
        );
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_every_instance_is_probed() {
        let mut meshes = MeshCache::new();
        let handle = meshes.insert("pad", CollisionMesh::plane(1.0, 1));
        let collider = Collider::instanced(
            handle,
            vec![
                Mat4::new_translation(&Vec3::new(0.0, 0.0, 0.0)),
                Mat4::new_translation(&Vec3::new(0.0, 0.5, 0.0)),
                Mat4::new_translation(&Vec3::new(50.0, 0.0, 0.0)),
            ],
            CollisionFilter::SCENARIO,
        );
        let mut contacts = ContactSet::new();

        collider.get_collisions(
            owner(),
            &meshes,
            &ProbeSettings::default(),
            Vec3::new(0.1, 0.0, 0.2),
            CollisionFilter::NONE,
            &mut contacts,
        );

        assert!(collider.is_instanced());
        assert_eq!(contacts.ground_collisions.len(), 2);
    }

    #[test]
    fn test_surface_tags_from_mesh_names() {
        assert_eq!(SurfaceTags::from_mesh_name("data/Ramp_big.obj"), SurfaceTags::RAMP);
        assert!(SurfaceTags::from_mesh_name("dashboard.obj").contains(SurfaceTags::BOOST));
        assert!(SurfaceTags::from_mesh_name("finish_line.obj").contains(SurfaceTags::GOAL));
        assert!(SurfaceTags::from_mesh_name("checkpoint_2.obj").bounces());
        assert!(!SurfaceTags::from_mesh_name("jump.obj").bounces());
        assert!(SurfaceTags::from_mesh_name("rock_wall.obj").is_empty());
    }
}
