//! Collision detection
//!
//! Model-space meshes are transformed on demand and queried with spheres and
//! rays; there is no broad phase beyond a per-instance bounding sphere.
//!
//! - [`primitives`] - Basic geometric primitives (rays, spheres, triangles)
//! - [`mesh`] - Triangle-soup collision meshes and their queries
//! - [`record`] - Query results

pub mod mesh;
pub mod primitives;
pub mod record;

pub use mesh::{CollisionMesh, MeshContact, MeshError};
pub use primitives::{BoundingSphere, Ray, Triangle};
pub use record::{CollisionRecord, ContactSet};
