//! Physics module for collision detection
//!
//! Discrete sphere and ray queries against static triangle meshes. Collision
//! response lives with the characters that consume the contacts.

pub mod collider;
pub mod collision;
pub mod collision_layers;

pub use collider::{Collider, ProbeSettings, SurfaceTags};
pub use collision::{
    BoundingSphere, CollisionMesh, CollisionRecord, ContactSet, MeshContact, MeshError, Ray, Triangle,
};
pub use collision_layers::CollisionFilter;
