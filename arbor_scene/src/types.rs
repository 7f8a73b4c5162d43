// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, flags, handles, errors.

use thiserror::Error;

/// Identifier for a node in the tree (generational).
///
/// Ids stay cheap to copy and compare; a stale id (pointing at a removed and
/// possibly recycled slot) is detected by its generation and treated as
/// absent by every query.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling event acceptance and clipping.
    ///
    /// Visibility is not a flag: it is an observable property on the node so
    /// it can be watched and bound.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is an eligible final target for pointer press/release/click/drag.
        const MOUSE  = 0b0000_0001;
        /// Node is an eligible final target for scroll events.
        const SCROLL = 0b0000_0010;
        /// Node is an eligible keyboard focus target.
        const KEYS   = 0b0000_0100;
        /// Node clips its subtree to its `[0,w]x[0,h]` box during hit testing.
        const CLIP   = 0b0000_1000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Opaque handle supplied by the native rendering collaborator.
///
/// The core never interprets the value; it is carried on nodes and passed
/// back to the platform when a root is displayed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RenderHandle(pub u64);

/// Errors from structural scene mutations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced node was removed (or its id is from another scene).
    #[error("node id is stale")]
    Stale,
    /// The child already has a parent; detach it first.
    #[error("child already has a parent")]
    AlreadyParented,
    /// Only group nodes own children.
    #[error("node is not a group")]
    NotAContainer,
    /// Attaching here would make the tree cyclic.
    #[error("attach would create a cycle")]
    WouldCycle,
}
