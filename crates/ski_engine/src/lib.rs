//! # Ski Engine
//!
//! Scene graph, mesh collision queries and scene-wide collision aggregation
//! for slope racing games.
//!
//! ## Features
//!
//! - **Collision meshes**: model-space triangle soups queried with spheres and rays
//! - **Colliders**: instanced static geometry with layer filtering and surface tags
//! - **World queries**: character probes and ray casts over the whole scene
//! - **Scene files**: text format with per-instance transforms
//!
//! ## Quick Start
//!
//! ```rust
//! use ski_engine::prelude::*;
//!
//! let mut world = World::new(ProbeSettings::default());
//! let floor = world.meshes_mut().insert("floor", CollisionMesh::plane(50.0, 4));
//! world.add_collider("floor", floor, vec![Mat4::identity()], CollisionFilter::SCENARIO, SurfaceTags::empty());
//!
//! let hit = world.raycast(Vec3::new(0.5, 10.0, 2.0), Vec3::new(0.0, -1.0, 0.0), CollisionFilter::ALL, true, 20.0);
//! assert!(hit.collision);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod world;

pub use world::{SceneLoadReport, World};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{InMemoryMeshSource, MeshCache, MeshHandle, MeshSource, ObjMeshSource},
        config::{Config, ConfigError, ConfigFormat},
        foundation::{
            math::{safe_normalize, world_up, Mat4, Mat4Ext, Vec3},
            time::FixedTimestep,
        },
        physics::{
            Collider, CollisionFilter, CollisionMesh, CollisionRecord, ContactSet, ProbeSettings, SurfaceTags,
        },
        scene::{NodeId, NodeKind, SceneDescription, SceneGraph, SceneNode},
        SceneLoadReport, World,
    };
}
