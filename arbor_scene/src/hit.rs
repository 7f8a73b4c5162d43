// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive front-to-back hit testing with clip pruning.
//!
//! Both traversal modes share the same pruning rules:
//!
//! - An invisible node excludes its entire subtree.
//! - A clipping node whose `[0,w]x[0,h]` box does not contain the (locally
//!   transformed) point excludes its entire subtree without descending —
//!   an early exit, not merely a correctness filter.
//! - Children are tested in reverse list order: the last-added child is
//!   visually front-most and wins ties.
//!
//! The modes differ in how they treat filters. [`Scene::nodes_at`] takes an
//! optional filter that prunes whole subtrees (a rejected node is not
//! descended into). [`Scene::topmost_at`] takes an optional *eligibility*
//! predicate that gates only final-target matching: containers are still
//! traversed to reach eligible descendants regardless of their own flags.
//!
//! Traversal borrows the scene immutably, so the tree cannot change while a
//! walk is in progress; the router resolves targets to ids before any
//! mutating callback runs.

use kurbo::Point;

use crate::node::Node;
use crate::tree::Scene;
use crate::types::NodeId;

/// Predicate over nodes used by the hit-test entry points.
pub type NodeFilter<'a> = &'a dyn Fn(&Node) -> bool;

impl Scene {
    /// All nodes under `root` containing the global point, front-most first.
    ///
    /// For each node the child matches come first (in front-to-back order),
    /// followed by the node itself if its own shape contains the point. When
    /// `filter` is present, a rejected node prunes its whole subtree.
    pub fn nodes_at(&self, root: NodeId, pt: Point, filter: Option<NodeFilter<'_>>) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_at(root, pt, filter, &mut out);
        out
    }

    fn collect_at(
        &self,
        id: NodeId,
        pt: Point,
        filter: Option<NodeFilter<'_>>,
        out: &mut Vec<NodeId>,
    ) {
        let Some(node) = self.get(id) else { return };
        if !node.visible.get() {
            return;
        }
        if let Some(f) = filter
            && !f(node)
        {
            return;
        }
        let local = node.to_local(pt);
        if node.clip_rejects(local) {
            return;
        }
        for &child in node.children().iter().rev() {
            self.collect_at(child, local, filter, out);
        }
        if node.contains(local) {
            out.push(id);
        }
    }

    /// The topmost node under `root` containing the global point.
    ///
    /// Same traversal as [`Scene::nodes_at`], but the first child subtree
    /// producing a match short-circuits, and the node's own shape is only
    /// consulted when no child matched. `eligible`, when present, restricts
    /// which nodes may be returned without restricting descent.
    pub fn topmost_at(
        &self,
        root: NodeId,
        pt: Point,
        eligible: Option<NodeFilter<'_>>,
    ) -> Option<NodeId> {
        let node = self.get(root)?;
        if !node.visible.get() {
            return None;
        }
        let local = node.to_local(pt);
        if node.clip_rejects(local) {
            return None;
        }
        for &child in node.children().iter().rev() {
            if let Some(hit) = self.topmost_at(child, local, eligible) {
                return Some(hit);
            }
        }
        if eligible.is_none_or(|f| f(node)) && node.contains(local) {
            Some(root)
        } else {
            None
        }
    }
}
