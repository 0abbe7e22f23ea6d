//! Scene management
//!
//! The entity tree and the text format static geometry is loaded from.

pub mod scene_graph;
pub mod scene_parser;

pub use scene_graph::{NodeId, NodeKind, SceneGraph, SceneNode};
pub use scene_parser::{load_scene_file, parse_scene, EntryKind, SceneDescription, SceneEntry, SceneError};
