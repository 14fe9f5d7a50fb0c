//! Scene graph
//!
//! Nodes are stored flat and keyed by id; hierarchy lives in `parent`/`children`.
//! A `NodeId` is only a handle: it may outlive its node, so every lookup
//! goes through `contains`/`node` and is allowed to fail.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::components::Node;
use crate::error::SceneError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the host is simulating (live) or being edited at design time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostMode {
    Editing,
    #[default]
    Playing,
}

impl HostMode {
    pub fn is_playing(&self) -> bool {
        matches!(self, HostMode::Playing)
    }
}

/// Result of `Scene::duplicate`.
#[derive(Debug, Clone)]
pub struct Duplicate {
    pub root: NodeId,
    /// Original node id to its copy, for every node of the subtree.
    pub mapping: HashMap<NodeId, NodeId>,
}

impl Duplicate {
    pub fn map(&self, original: NodeId) -> Option<NodeId> {
        self.mapping.get(&original).copied()
    }
}

/// Copy of one subtree keeping its node ids. See `Scene::capture`.
#[derive(Debug, Clone)]
pub struct Subtree {
    root: NodeId,
    parent: Option<NodeId>,
    /// Index among the parent's children, or among the roots
    position: usize,
    nodes: Vec<Node>,
}

impl Subtree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    mode: HostMode,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: HostMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> HostMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: HostMode) {
        self.mode = mode;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Create a node, appended as the last child of `parent` (or as a root).
    pub fn spawn(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> Result<NodeId> {
        let id = NodeId::new();
        match parent {
            Some(parent_id) => {
                self.node_mut(parent_id)?.children.push(id);
            }
            None => self.roots.push(id),
        }
        self.nodes.insert(id, Node::new(id, name.into(), parent));
        Ok(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walk from `id` (inclusive) up to its root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// True when `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.node(id)?;
        if let Some(parent_id) = parent {
            self.node(parent_id)?;
            if self.is_ancestor(id, parent_id) {
                return Err(SceneError::CyclicParent {
                    child: id,
                    parent: parent_id,
                });
            }
        }

        self.detach(id);
        match parent {
            Some(parent_id) => self.node_mut(parent_id)?.children.push(id),
            None => self.roots.push(id),
        }
        self.node_mut(id)?.parent = parent;
        Ok(())
    }

    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        self.node_mut(id)?.active = active;
        Ok(())
    }

    /// A node is active in the hierarchy only if it and all its ancestors are.
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .all(|a| self.nodes.get(&a).is_some_and(|n| n.active))
    }

    /// Remove a node with its whole subtree. Returns `false` if it was already gone.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }

        self.detach(id);

        let mut stack = vec![id];
        let mut removed = 0usize;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed += 1;
            }
        }

        tracing::trace!(node = %id, removed, "Destroyed node subtree");
        true
    }

    /// Deep-copy the subtree rooted at `id` under `parent`, with fresh ids.
    pub fn duplicate(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<Duplicate> {
        self.node(id)?;
        if let Some(parent_id) = parent {
            self.node(parent_id)?;
        }

        let mut mapping = HashMap::new();
        let root = self.copy_subtree(id, parent, &mut mapping)?;
        match parent {
            Some(parent_id) => self.node_mut(parent_id)?.children.push(root),
            None => self.roots.push(root),
        }

        Ok(Duplicate { root, mapping })
    }

    fn copy_subtree(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        mapping: &mut HashMap<NodeId, NodeId>,
    ) -> Result<NodeId> {
        let original = self.node(id)?.clone();
        let copy_id = NodeId::new();
        mapping.insert(id, copy_id);

        let mut children = Vec::with_capacity(original.children.len());
        for child in &original.children {
            children.push(self.copy_subtree(*child, Some(copy_id), mapping)?);
        }

        self.nodes.insert(
            copy_id,
            Node {
                id: copy_id,
                parent,
                children,
                ..original
            },
        );
        Ok(copy_id)
    }

    /// Copy the subtree rooted at `root`, ids included, so it can be put
    /// back later with `restore`. Nothing outside the subtree is recorded.
    pub fn capture(&self, root: NodeId) -> Result<Subtree> {
        let parent = self.node(root)?.parent;
        let siblings = match parent {
            Some(parent_id) => self.children(parent_id),
            None => self.roots.as_slice(),
        };
        let position = siblings
            .iter()
            .position(|s| *s == root)
            .unwrap_or(siblings.len());

        let mut nodes = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().copied());
                nodes.push(node.clone());
            }
        }

        Ok(Subtree {
            root,
            parent,
            position,
            nodes,
        })
    }

    /// Replace whatever lives at the captured root with the captured copy.
    /// Nodes created under the root since the capture are dropped; the rest
    /// of the scene is left alone. The original parent must still exist.
    pub fn restore(&mut self, subtree: &Subtree) -> Result<()> {
        if let Some(parent_id) = subtree.parent {
            self.node(parent_id)?;
        }

        self.destroy(subtree.root);
        for node in &subtree.nodes {
            // Moved out of the subtree since the capture
            if self.contains(node.id) {
                self.destroy(node.id);
            }
        }
        for node in &subtree.nodes {
            self.nodes.insert(node.id, node.clone());
        }

        let siblings = match subtree.parent {
            Some(parent_id) => &mut self.node_mut(parent_id)?.children,
            None => &mut self.roots,
        };
        let position = subtree.position.min(siblings.len());
        siblings.insert(position, subtree.root);

        tracing::trace!(node = %subtree.root, nodes = subtree.nodes.len(), "Restored subtree");
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        match self.parent(id) {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// First canvas found walking roots depth-first.
    pub fn find_first_canvas(&self) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.canvas.is_some() {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Nearest canvas at or above `id`.
    pub fn find_canvas_ancestor(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|a| self.nodes.get(a).is_some_and(|n| n.canvas.is_some()))
    }
}

pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Canvas;

    #[test]
    fn test_spawn_and_destroy_subtree() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None).unwrap();
        let child = scene.spawn("child", Some(root)).unwrap();
        let grandchild = scene.spawn("grandchild", Some(child)).unwrap();

        assert_eq!(scene.children(root), &[child]);
        assert!(scene.destroy(child));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.children(root).is_empty());

        // Already gone
        assert!(!scene.destroy(child));
    }

    #[test]
    fn test_restore_only_touches_subtree() {
        let mut scene = Scene::new();
        let canvas = scene.spawn("canvas", None).unwrap();
        let first = scene.spawn("first", Some(canvas)).unwrap();
        let button = scene.spawn("button", Some(first)).unwrap();
        let second = scene.spawn("second", Some(canvas)).unwrap();

        let saved = scene.capture(first).unwrap();
        assert_eq!(saved.len(), 2);

        let extra = scene.spawn("extra", Some(first)).unwrap();
        scene.destroy(button);
        scene.node_mut(first).unwrap().name = "renamed".to_string();
        let third = scene.spawn("third", Some(canvas)).unwrap();
        scene.node_mut(second).unwrap().active = false;

        scene.restore(&saved).unwrap();

        assert_eq!(scene.node(first).unwrap().name, "first");
        assert_eq!(scene.children(first), &[button]);
        assert!(!scene.contains(extra));
        // Siblings keep their state and the root keeps its slot
        assert_eq!(scene.children(canvas), &[first, second, third]);
        assert!(!scene.node(second).unwrap().active);
    }

    #[test]
    fn test_restore_needs_parent() {
        let mut scene = Scene::new();
        let canvas = scene.spawn("canvas", None).unwrap();
        let group = scene.spawn("group", Some(canvas)).unwrap();
        let saved = scene.capture(group).unwrap();

        scene.destroy(canvas);
        assert_eq!(
            scene.restore(&saved),
            Err(SceneError::NodeNotFound(canvas))
        );
        assert!(!scene.contains(group));
    }

    #[test]
    fn test_spawn_under_missing_parent_fails() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None).unwrap();
        scene.destroy(root);
        assert_eq!(
            scene.spawn("orphan", Some(root)),
            Err(SceneError::NodeNotFound(root))
        );
    }

    #[test]
    fn test_active_in_hierarchy() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None).unwrap();
        let child = scene.spawn("child", Some(root)).unwrap();

        assert!(scene.is_active_in_hierarchy(child));
        scene.set_active(root, false).unwrap();
        assert!(!scene.is_active_in_hierarchy(child));
        assert!(scene.node(child).unwrap().active);
    }

    #[test]
    fn test_duplicate_maps_every_node() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None).unwrap();
        let button = scene.spawn("Tab_0", Some(root)).unwrap();
        let label = scene.spawn("Tab Text", Some(button)).unwrap();

        let copy = scene.duplicate(button, Some(root)).unwrap();
        assert_ne!(copy.root, button);
        assert_eq!(scene.children(root), &[button, copy.root]);

        let label_copy = copy.map(label).unwrap();
        assert_eq!(scene.parent(label_copy), Some(copy.root));
        assert_eq!(scene.node(label_copy).unwrap().name, "Tab Text");
        assert_eq!(scene.node(copy.root).unwrap().name, "Tab_0");
    }

    #[test]
    fn test_set_parent_rejects_cycle() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None).unwrap();
        let child = scene.spawn("child", Some(root)).unwrap();

        assert!(scene.set_parent(root, Some(child)).is_err());
        scene.set_parent(child, None).unwrap();
        assert_eq!(scene.roots(), &[root, child]);
    }

    #[test]
    fn test_find_canvas() {
        let mut scene = Scene::new();
        let loose = scene.spawn("loose", None).unwrap();
        let canvas = scene.spawn("Canvas", None).unwrap();
        scene.node_mut(canvas).unwrap().canvas = Some(Canvas::default());
        let panel = scene.spawn("panel", Some(canvas)).unwrap();

        assert_eq!(scene.find_first_canvas(), Some(canvas));
        assert_eq!(scene.find_canvas_ancestor(panel), Some(canvas));
        assert_eq!(scene.find_canvas_ancestor(loose), None);
    }
}
