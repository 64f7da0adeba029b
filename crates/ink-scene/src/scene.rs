//! Node arena

use std::collections::HashMap;

use tiny_skia::{Pixmap, Transform};

use crate::node::{Node, NodeContent, NodeId};

/// Scene graph: an id-keyed arena of nodes.
///
/// Ids stay valid until the node is destroyed; stale ids resolve to `None`
/// and are safe to pass to every operation.
#[derive(Default)]
pub struct Scene {
    nodes: HashMap<u64, Node>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, content: NodeContent) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, Node::new(content));
        NodeId(id)
    }

    /// Create a detached grouping node
    pub fn create_group(&mut self) -> NodeId {
        self.insert(NodeContent::Group)
    }

    /// Create a detached sprite node owning `pixmap`
    pub fn create_sprite(&mut self, pixmap: Pixmap) -> NodeId {
        self.insert(NodeContent::Sprite(pixmap))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id.0)
    }

    /// Parent of `id`, if the node exists and is attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id.0).and_then(|n| n.parent)
    }

    /// Attach `child` under `parent`, detaching it from any previous parent
    /// first. Idempotent: re-attaching to the current parent is a no-op, so
    /// this is safe to call every frame.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(&parent.0) {
            return;
        }
        let old = match self.nodes.get(&child.0) {
            Some(node) => node.parent,
            None => return,
        };
        if old == Some(parent) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent.0) {
            node.children.push(child);
        }
    }

    /// Detach `child` from its parent, leaving it alive but unparented
    pub fn detach(&mut self, child: NodeId) {
        let Some(old) = self.nodes.get(&child.0).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&old.0) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(&child.0) {
            node.parent = None;
        }
    }

    /// Destroy `id` and its whole subtree. The node is detached from its
    /// parent before any memory is freed, so no live node keeps a
    /// reference to a destroyed one.
    pub fn destroy(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        let mut freed = 0usize;
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next.0) {
                stack.extend(node.children);
                freed += 1;
            }
        }
        if freed > 1 {
            tracing::trace!(root = id.0, freed, "destroyed node subtree");
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id.0) {
            node.visible = visible;
        }
    }

    /// Local transform of a node: translate, then scale, then rotate.
    /// Node origin plays no part here.
    pub fn local_transform(&self, id: NodeId) -> Transform {
        let Some(node) = self.nodes.get(&id.0) else {
            return Transform::identity();
        };
        Transform::from_translate(node.pos.0, node.pos.1)
            .pre_concat(Transform::from_scale(node.scale.0, node.scale.1))
            .pre_concat(Transform::from_rotate(node.rotation))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_reparents() {
        let mut scene = Scene::new();
        let a = scene.create_group();
        let b = scene.create_group();
        let child = scene.create_group();

        scene.attach(a, child);
        assert_eq!(scene.parent(child), Some(a));
        assert!(scene.get(a).unwrap().children().contains(&child));

        scene.attach(b, child);
        assert_eq!(scene.parent(child), Some(b));
        assert!(!scene.get(a).unwrap().children().contains(&child));
    }

    #[test]
    fn test_attach_idempotent() {
        let mut scene = Scene::new();
        let parent = scene.create_group();
        let child = scene.create_group();

        scene.attach(parent, child);
        scene.attach(parent, child);
        scene.attach(parent, child);

        assert_eq!(scene.get(parent).unwrap().children().len(), 1);
    }

    #[test]
    fn test_destroy_detaches_first() {
        let mut scene = Scene::new();
        let parent = scene.create_group();
        let child = scene.create_group();
        let grandchild = scene.create_group();
        scene.attach(parent, child);
        scene.attach(child, grandchild);

        scene.destroy(child);

        assert!(scene.get(parent).unwrap().children().is_empty());
        assert!(scene.get(child).is_none());
        assert!(scene.get(grandchild).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_stale_ids_are_safe() {
        let mut scene = Scene::new();
        let id = scene.create_group();
        scene.destroy(id);

        scene.detach(id);
        scene.destroy(id);
        scene.set_visible(id, false);
        assert!(scene.get(id).is_none());
        assert_eq!(scene.local_transform(id), Transform::identity());
    }
}
