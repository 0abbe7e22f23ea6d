//! Scene graph
//!
//! Nodes live in a slot-map arena and form a tree under a single root. What a
//! node *is* (plain transform, render mesh, collider, actor) is a tagged
//! variant, queried by pattern match.

use slotmap::{new_key_type, SlotMap};

use crate::assets::MeshHandle;
use crate::foundation::math::Mat4;
use crate::physics::Collider;

new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}

/// Capability of a scene node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Transform only (markers, grouping)
    Plain,
    /// Geometry that is drawn but never collided with
    Mesh {
        /// Cached mesh
        mesh: MeshHandle,
    },
    /// Static collision geometry
    Collider(Collider),
    /// Simulated character; never collides with itself
    Actor,
}

/// One node of the tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display / lookup name
    pub name: String,
    /// Transform relative to the parent
    pub model: Mat4,
    /// What the node is
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// Node of the given kind with an identity transform
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            model: Mat4::identity(),
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Plain transform node
    pub fn plain(name: impl Into<String>, model: Mat4) -> Self {
        Self::new(name, NodeKind::Plain).with_model(model)
    }

    /// Collider node; its own transform is the first instance's
    pub fn collider(name: impl Into<String>, collider: Collider) -> Self {
        let model = collider.models().first().copied().unwrap_or_else(Mat4::identity);
        Self::new(name, NodeKind::Collider(collider)).with_model(model)
    }

    /// Actor node
    pub fn actor(name: impl Into<String>, model: Mat4) -> Self {
        Self::new(name, NodeKind::Actor).with_model(model)
    }

    /// Replace the transform
    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self
    }

    /// Collider capability, if any
    pub fn as_collider(&self) -> Option<&Collider> {
        match &self.kind {
            NodeKind::Collider(collider) => Some(collider),
            _ => None,
        }
    }

    /// True for simulated characters
    pub fn is_actor(&self) -> bool {
        matches!(self.kind, NodeKind::Actor)
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed entity tree
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    /// Create a graph holding only the root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root", NodeKind::Plain));
        Self { nodes, root }
    }

    /// Root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Attach `node` under the root
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let root = self.root;
        let id = self.nodes.insert(node);
        self.link(root, id);
        id
    }

    /// Attach `node` under `parent`; `None` if the parent does not exist
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(node);
        self.link(parent, id);
        Some(id)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Detach `child` from `parent` without destroying it
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(parent) else {
            return false;
        };
        let before = node.children.len();
        node.children.retain(|&c| c != child);
        let detached = node.children.len() != before;

        if detached {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
        detached
    }

    /// Destroy a node and its whole subtree; returns how many nodes went.
    /// The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.nodes.contains_key(id) {
            return 0;
        }
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            self.remove_child(parent, id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Node by id
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Whether `id` is alive
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Ordered children of `id` (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// Accumulated transform from the root down to `id`
    pub fn global_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id)?;
        let mut matrix = node.model;
        while let Some(parent) = node.parent.and_then(|p| self.nodes.get(p)) {
            matrix = parent.model * matrix;
            node = parent;
        }
        Some(matrix)
    }

    /// Colliders directly under the root, in child order
    pub fn root_colliders(&self) -> impl Iterator<Item = (NodeId, &Collider)> + '_ {
        self.children(self.root)
            .iter()
            .filter_map(|&id| self.nodes.get(id).and_then(|n| n.as_collider()).map(|c| (id, c)))
    }

    /// Total number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root is left
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
