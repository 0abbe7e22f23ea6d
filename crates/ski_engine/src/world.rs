//! World: scene graph, shared meshes and scene-wide collision queries
//!
//! Queries only read the graph. Structural changes requested while a tick is
//! running go through [`World::destroy_entity`] and are applied by
//! [`World::flush_destroyed`] once the tick is over.

use crate::assets::{MeshCache, MeshHandle, MeshSource};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::physics::{Collider, CollisionFilter, CollisionRecord, ContactSet, ProbeSettings, SurfaceTags};
use crate::scene::{EntryKind, NodeId, SceneDescription, SceneGraph, SceneNode};

/// Summary of a scene load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLoadReport {
    /// Collider nodes created
    pub colliders: usize,
    /// Total collider instances
    pub instances: usize,
    /// Marker nodes created
    pub markers: usize,
    /// Mesh paths that could not be loaded
    pub skipped: Vec<String>,
}

/// Simulation context owning everything collision queries need
#[derive(Debug, Default)]
pub struct World {
    graph: SceneGraph,
    meshes: MeshCache,
    probes: ProbeSettings,
    pending_destroy: Vec<NodeId>,
    spawn_point: Option<Vec3>,
}

impl World {
    /// Empty world using the given probe geometry
    pub fn new(probes: ProbeSettings) -> Self {
        Self {
            probes,
            ..Self::default()
        }
    }

    /// Entity tree
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable entity tree
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Shared mesh cache
    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    /// Mutable mesh cache
    pub fn meshes_mut(&mut self) -> &mut MeshCache {
        &mut self.meshes
    }

    /// Probe geometry for character queries
    pub fn probes(&self) -> &ProbeSettings {
        &self.probes
    }

    /// Replace the probe geometry
    pub fn set_probes(&mut self, probes: ProbeSettings) {
        self.probes = probes;
    }

    /// Spawn position read from the scene, if any
    pub fn spawn_point(&self) -> Option<Vec3> {
        self.spawn_point
    }

    /// Override the spawn position
    pub fn set_spawn_point(&mut self, spawn: Vec3) {
        self.spawn_point = Some(spawn);
    }

    /// Attach a node under the root
    pub fn add_entity(&mut self, node: SceneNode) -> NodeId {
        self.graph.add(node)
    }

    /// Attach a collider node under the root
    pub fn add_collider(
        &mut self,
        name: &str,
        mesh: MeshHandle,
        models: Vec<Mat4>,
        layer: CollisionFilter,
        surface: SurfaceTags,
    ) -> NodeId {
        let collider = Collider::instanced(mesh, models, layer).with_surface(surface);
        self.graph.add(SceneNode::collider(name, collider))
    }

    /// Update a node's local transform
    pub fn set_model(&mut self, id: NodeId, model: Mat4) {
        if let Some(node) = self.graph.get_mut(id) {
            node.model = model;
        }
    }

    /// Queue a node for removal at the end of the tick
    pub fn destroy_entity(&mut self, id: NodeId) {
        if !self.pending_destroy.contains(&id) {
            self.pending_destroy.push(id);
        }
    }

    /// Nodes waiting for [`World::flush_destroyed`]
    pub fn pending_destroy(&self) -> &[NodeId] {
        &self.pending_destroy
    }

    /// Remove every queued node and its subtree; returns how many nodes went
    pub fn flush_destroyed(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_destroy);
        let removed: usize = pending.into_iter().map(|id| self.graph.remove(id)).sum();
        if removed > 0 {
            log::debug!("Destroyed {} scene nodes", removed);
        }
        removed
    }

    /// Create nodes for a parsed scene. Meshes are resolved through `source`
    /// and shared through the cache; unloadable meshes are skipped.
    pub fn load_scene(&mut self, scene: &SceneDescription, source: &dyn MeshSource) -> SceneLoadReport {
        let mut report = SceneLoadReport::default();

        for entry in &scene.entries {
            match entry.kind() {
                EntryKind::PlayerSpawn => {
                    if let Some(model) = entry.models.first() {
                        self.spawn_point = Some(model.translation());
                    }
                }
                EntryKind::Marker => {
                    for model in &entry.models {
                        self.graph.add(SceneNode::plain(entry.name.clone(), *model));
                        report.markers += 1;
                    }
                }
                EntryKind::Mesh => {
                    let handle = match self.meshes.load(&entry.name, source) {
                        Ok(handle) => handle,
                        Err(e) => {
                            log::warn!("Skipping collider '{}': {}", entry.name, e);
                            report.skipped.push(entry.name.clone());
                            continue;
                        }
                    };
                    self.add_collider(
                        &entry.name,
                        handle,
                        entry.models.clone(),
                        layer_for(&entry.name),
                        SurfaceTags::from_mesh_name(&entry.name),
                    );
                    report.colliders += 1;
                    report.instances += entry.models.len();
                }
            }
        }

        log::info!(
            "Scene loaded: {} colliders, {} instances, {} markers, {} skipped",
            report.colliders,
            report.instances,
            report.markers,
            report.skipped.len()
        );
        report
    }

    /// Probe every collider under the root around a character standing at
    /// `target`. Contacts are concatenated in child order.
    pub fn test_scene_collisions(&self, target: Vec3, filter: CollisionFilter) -> ContactSet {
        let mut contacts = ContactSet::new();
        for (id, collider) in self.graph.root_colliders() {
            collider.get_collisions(id, &self.meshes, &self.probes, target, filter, &mut contacts);
        }
        log::trace!(
            "Scene scan at {:?}: {} contacts, {} ground",
            target,
            contacts.collisions.len(),
            contacts.ground_collisions.len()
        );
        contacts
    }

    /// Cast a ray against every collider on `layer`.
    ///
    /// With `closest` the nearest hit within `max_dist` is returned, otherwise
    /// the first one found. Actors are never tested. The record's `collision`
    /// flag is false when nothing was hit.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        layer: CollisionFilter,
        closest: bool,
        max_dist: f32,
    ) -> CollisionRecord {
        let mut best = CollisionRecord::miss(max_dist);

        for &id in self.graph.children(self.graph.root()) {
            let Some(node) = self.graph.get(id) else {
                continue;
            };
            if node.is_actor() {
                continue;
            }
            let Some(collider) = node.as_collider() else {
                continue;
            };
            if !collider.participates(layer) {
                continue;
            }
            let Some(mesh) = self.meshes.get(collider.mesh()) else {
                continue;
            };

            for model in collider.models() {
                let Some(contact) = mesh.test_ray_collision(model, origin, direction, max_dist) else {
                    continue;
                };
                if best.collision && contact.distance >= best.distance {
                    continue;
                }

                best = CollisionRecord::hit(contact.point, contact.normal, contact.distance, id, collider.surface());
                if !closest {
                    return best;
                }
            }
        }

        best
    }
}

/// Scene geometry named like a wall bounces, everything else is terrain
fn layer_for(name: &str) -> CollisionFilter {
    if name.to_ascii_lowercase().contains("wall") {
        CollisionFilter::WALL
    } else {
        CollisionFilter::SCENARIO
    }
}
