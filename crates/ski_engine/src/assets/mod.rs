//! Asset management
//!
//! Collision meshes are shared assets: the cache owns them and hands out
//! slot-map handles, colliders only store the handle.

pub mod obj_loader;

pub use obj_loader::{parse_obj, ObjMeshSource};

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::physics::collision::{CollisionMesh, MeshError};

new_key_type! {
    /// Handle to a mesh stored in a [`MeshCache`]
    pub struct MeshHandle;
}

/// Resolves a mesh path into collision geometry
pub trait MeshSource {
    /// Load the mesh stored at `path`
    fn load(&self, path: &str) -> Result<CollisionMesh, MeshError>;
}

/// Mesh source backed by meshes registered in memory, used for procedural
/// courses and tests
#[derive(Debug, Default)]
pub struct InMemoryMeshSource {
    meshes: HashMap<String, CollisionMesh>,
}

impl InMemoryMeshSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh under `path`
    pub fn insert(&mut self, path: impl Into<String>, mesh: CollisionMesh) {
        self.meshes.insert(path.into(), mesh);
    }
}

impl MeshSource for InMemoryMeshSource {
    fn load(&self, path: &str) -> Result<CollisionMesh, MeshError> {
        self.meshes.get(path).cloned().ok_or_else(|| {
            MeshError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no mesh registered as '{path}'"),
            ))
        })
    }
}

/// Name-indexed cache of collision meshes
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: SlotMap<MeshHandle, CollisionMesh>,
    by_name: HashMap<String, MeshHandle>,
}

impl MeshCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `mesh` under `name`, replacing any previous mesh of that name
    pub fn insert(&mut self, name: impl Into<String>, mesh: CollisionMesh) -> MeshHandle {
        let name = name.into();
        if let Some(&handle) = self.by_name.get(&name) {
            if let Some(slot) = self.meshes.get_mut(handle) {
                *slot = mesh;
                return handle;
            }
        }
        let handle = self.meshes.insert(mesh);
        self.by_name.insert(name, handle);
        handle
    }

    /// Return the cached handle for `name`, building the mesh on first use
    pub fn get_or_insert_with<F>(&mut self, name: &str, build: F) -> Result<MeshHandle, MeshError>
    where
        F: FnOnce() -> Result<CollisionMesh, MeshError>,
    {
        if let Some(&handle) = self.by_name.get(name) {
            return Ok(handle);
        }
        let mesh = build()?;
        log::debug!("Cached collision mesh '{}' ({} triangles)", name, mesh.triangle_count());
        Ok(self.insert(name, mesh))
    }

    /// Load `path` through `source` unless it is already cached
    pub fn load(&mut self, path: &str, source: &dyn MeshSource) -> Result<MeshHandle, MeshError> {
        self.get_or_insert_with(path, || source.load(path))
    }

    /// Mesh for a handle
    pub fn get(&self, handle: MeshHandle) -> Option<&CollisionMesh> {
        self.meshes.get(handle)
    }

    /// Handle registered under `name`
    pub fn handle(&self, name: &str) -> Option<MeshHandle> {
        self.by_name.get(name).copied()
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_cache_builds_once() {
        let mut cache = MeshCache::new();
        let mut builds = 0;

        let first = cache
            .get_or_insert_with("floor", || {
                builds += 1;
                Ok(CollisionMesh::plane(10.0, 1))
            })
            .unwrap();
        let second = cache
            .get_or_insert_with("floor", || {
                builds += 1;
                Ok(CollisionMesh::plane(10.0, 1))
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(builds, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let mut cache = MeshCache::new();
        let source = InMemoryMeshSource::new();
        assert!(cache.load("missing.obj", &source).is_err());
        assert!(cache.is_empty());
        assert!(cache.handle("missing.obj").is_none());
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut cache = MeshCache::new();
        let a = cache.insert("box", CollisionMesh::cuboid(Vec3::repeat(1.0)));
        let b = cache.insert("box", CollisionMesh::plane(1.0, 1));
        assert_eq!(a, b);
        assert_eq!(cache.get(a).unwrap().triangle_count(), 2);
    }
}
