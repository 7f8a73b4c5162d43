// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene storage: generational arena, structural edits, transforms, lookup.

use kurbo::Point;
use smallvec::SmallVec;

use crate::node::Node;
use crate::types::{NodeId, SceneError};

/// The scene tree.
///
/// Nodes live in a generational arena: ownership flows root → children
/// through the arena itself, and parent back-references are plain ids, so no
/// reference cycles can form. A removed slot is recycled with a bumped
/// generation, turning any outstanding id stale; stale ids are treated as
/// absent by every operation.
///
/// ## Example
///
/// ```
/// use arbor_scene::{Node, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(Node::group().w(200.0).h(200.0));
/// let rect = scene.insert(Node::rect().x(50.0).y(50.0).w(100.0).h(50.0));
/// scene.add_child(root, rect).unwrap();
/// assert_eq!(scene.children(root), [rect]);
/// ```
#[derive(Debug, Default)]
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    pub(crate) free_list: Vec<usize>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a detached node and return its id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Insert `node` and attach it under `parent` in one step.
    pub fn spawn(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        let id = self.insert(node);
        match self.add_child(parent, id) {
            Ok(()) => Ok(id),
            Err(e) => {
                // Roll the insertion back so the failed spawn leaves no orphan.
                self.nodes[id.idx()] = None;
                self.free_list.push(id.idx());
                Err(e)
            }
        }
    }

    /// Append `child` to the end of `parent`'s child list (front of z-order).
    ///
    /// Fails if either id is stale, if `parent` is not a group, if `child`
    /// already has a parent (detach first), or if `parent` lies inside
    /// `child`'s subtree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return Err(SceneError::Stale);
        }
        if !self.node(parent).is_group() {
            return Err(SceneError::NotAContainer);
        }
        if self.node(child).parent.is_some() {
            return Err(SceneError::AlreadyParented);
        }
        // Walk up from the parent; finding the child means the attach would
        // close a loop.
        let mut cur = Some(parent);
        while let Some(id) = cur {
            if id == child {
                return Err(SceneError::WouldCycle);
            }
            cur = self.node(id).parent;
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detach `id` from its parent, keeping the node and its subtree alive.
    ///
    /// Listeners registered against the detached subtree are not
    /// deregistered; they simply stop firing while the subtree is
    /// unreachable from the routed root and fire again if it is re-added.
    /// Stale ids are ignored.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Remove a node and its entire subtree, recycling their slots.
    ///
    /// Outstanding ids into the subtree become stale. Stale ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        let children: SmallVec<[NodeId; 4]> = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// True when `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.generations.get(id.idx()) == Some(&id.1) && self.nodes[id.idx()].is_some()
    }

    /// Borrow a node, or `None` for stale ids.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes[id.idx()].as_ref()
    }

    /// Borrow a node mutably, or `None` for stale ids.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes[id.idx()].as_mut()
    }

    /// The parent of `id`, if attached and live.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of `id` in z-order (last is front-most); empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Access a live node; panics on stale ids. Internal use only.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a live node mutably; panics on stale ids. Internal use only.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    /// Pre-order depth-first search for the first node under `root` (itself
    /// included) whose user id equals `ident`.
    ///
    /// Ids are not enforced unique; with duplicates the pre-order-first match
    /// wins. Absence is an ordinary outcome, not an error.
    pub fn find(&self, root: NodeId, ident: &str) -> Option<NodeId> {
        let node = self.get(root)?;
        if node.ident() == Some(ident) {
            return Some(root);
        }
        for &child in node.children.iter() {
            if let Some(found) = self.find(child, ident) {
                return Some(found);
            }
        }
        None
    }

    /// Map a point from root/global space into `id`'s local space.
    ///
    /// Walks the ancestor chain root→node, subtracting each node's position
    /// and dividing by its scale. Rotation is not part of the transform.
    pub fn global_to_local(&self, pt: Point, id: NodeId) -> Point {
        let mut chain: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.get(n) else { break };
            chain.push(n);
            cur = node.parent;
        }
        let mut p = pt;
        for n in chain.iter().rev() {
            p = self.node(*n).to_local(p);
        }
        p
    }

    /// Map a point from `id`'s local space into root/global space.
    ///
    /// Walks node→root, multiplying by each node's scale and adding its
    /// position; the exact inverse of [`Scene::global_to_local`].
    pub fn local_to_global(&self, pt: Point, id: NodeId) -> Point {
        let mut p = pt;
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.get(n) else { break };
            p = node.to_parent(p);
            cur = node.parent;
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn scene_with_root() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.insert(Node::group().w(200.0).h(200.0));
        (scene, root)
    }

    #[test]
    fn insert_and_attach() {
        let (mut scene, root) = scene_with_root();
        let a = scene.spawn(root, Node::rect().w(10.0).h(10.0)).unwrap();
        let b = scene.spawn(root, Node::rect().w(10.0).h(10.0)).unwrap();
        assert_eq!(scene.children(root), [a, b]);
        assert_eq!(scene.parent(a), Some(root));
    }

    #[test]
    fn attach_rejects_child_with_parent() {
        let (mut scene, root) = scene_with_root();
        let other = scene.insert(Node::group());
        let child = scene.spawn(root, Node::rect()).unwrap();
        assert_eq!(
            scene.add_child(other, child),
            Err(SceneError::AlreadyParented)
        );
        // Still attached where it was.
        assert_eq!(scene.parent(child), Some(root));
    }

    #[test]
    fn attach_rejects_non_group_parent() {
        let (mut scene, root) = scene_with_root();
        let rect = scene.spawn(root, Node::rect()).unwrap();
        let other = scene.insert(Node::rect());
        assert_eq!(scene.add_child(rect, other), Err(SceneError::NotAContainer));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.insert(Node::group());
        let b = scene.insert(Node::group());
        scene.add_child(a, b).unwrap();
        assert_eq!(scene.add_child(b, a), Err(SceneError::WouldCycle));
        let c = scene.insert(Node::group());
        scene.add_child(b, c).unwrap();
        assert_eq!(scene.add_child(c, a), Err(SceneError::WouldCycle));
    }

    #[test]
    fn detach_keeps_subtree_alive_and_reattachable() {
        let (mut scene, root) = scene_with_root();
        let group = scene.spawn(root, Node::group()).unwrap();
        let leaf = scene.spawn(group, Node::rect()).unwrap();

        scene.detach(group);
        assert!(scene.children(root).is_empty());
        assert!(scene.is_alive(group));
        assert!(scene.is_alive(leaf));
        assert_eq!(scene.parent(group), None);
        assert_eq!(scene.parent(leaf), Some(group));

        scene.add_child(root, group).unwrap();
        assert_eq!(scene.children(root), [group]);
    }

    #[test]
    fn remove_frees_subtree_and_invalidates_ids() {
        let (mut scene, root) = scene_with_root();
        let group = scene.spawn(root, Node::group()).unwrap();
        let leaf = scene.spawn(group, Node::rect()).unwrap();

        scene.remove(group);
        assert!(!scene.is_alive(group));
        assert!(!scene.is_alive(leaf));
        assert!(scene.get(leaf).is_none());
        assert!(scene.children(root).is_empty());
    }

    #[test]
    fn recycled_slot_gets_fresh_generation() {
        let mut scene = Scene::new();
        let a = scene.insert(Node::rect());
        scene.remove(a);
        let b = scene.insert(Node::rect());
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert!(!scene.is_alive(a));
        assert!(scene.is_alive(b));
    }

    #[test]
    fn find_returns_preorder_first_match() {
        let (mut scene, root) = scene_with_root();
        let inner = scene.spawn(root, Node::group()).unwrap();
        let first = scene.spawn(inner, Node::rect().id("dup")).unwrap();
        let _second = scene.spawn(root, Node::rect().id("dup")).unwrap();

        // `first` sits deeper but earlier in pre-order.
        assert_eq!(scene.find(root, "dup"), Some(first));
        assert_eq!(scene.find(root, "absent"), None);
    }

    #[test]
    fn find_matches_root_itself() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::group().id("root"));
        assert_eq!(scene.find(root, "root"), Some(root));
    }

    #[test]
    fn coordinate_roundtrip_through_nested_scales() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::group().x(10.0).y(10.0).sx(2.0).sy(2.0));
        let mid = scene
            .spawn(root, Node::group().x(5.0).y(-3.0).sx(0.5).sy(4.0))
            .unwrap();
        let leaf = scene.spawn(mid, Node::rect().x(7.0).y(9.0)).unwrap();

        let p = Point::new(123.0, -45.0);
        let local = scene.global_to_local(p, leaf);
        let back = scene.local_to_global(local, leaf);
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn global_to_local_subtracts_then_scales() {
        let mut scene = Scene::new();
        let root = scene.insert(Node::group().x(100.0).y(50.0).sx(2.0).sy(2.0));
        let local = scene.global_to_local(Point::new(120.0, 70.0), root);
        assert_eq!(local, Point::new(10.0, 10.0));
    }
}
