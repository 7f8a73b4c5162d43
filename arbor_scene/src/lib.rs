// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: a retained 2D scene tree with hit testing.
//!
//! ## Overview
//!
//! The scene is an ordered tree of visual nodes held in a generational arena
//! ([`Scene`]): ownership flows root → children through the arena, parent
//! back-references are plain [`NodeId`]s, and removed slots turn outstanding
//! ids stale rather than dangling.
//!
//! Each [`Node`] carries observable geometry properties (position, scale,
//! size, opacity, visibility — see [`arbor_reactive::Property`]), event
//! acceptance and clip [`NodeFlags`], and a shape [`Kind`] providing the
//! local containment test: rectangles and boxes, circles, even-odd polygons.
//!
//! ## Coordinate spaces
//!
//! Every node defines a local space: a child's coordinates are the parent's
//! with the node's position subtracted and scale divided out. Rotation is
//! not part of the transform chain. [`Scene::global_to_local`] and
//! [`Scene::local_to_global`] walk the ancestor chain in both directions and
//! are exact inverses of each other.
//!
//! ## Hit testing
//!
//! [`Scene::topmost_at`] and [`Scene::nodes_at`] search front-to-back
//! (last-added child first), honoring visibility and per-node clip bounds as
//! subtree-pruning early exits. See the [`hit`] module docs for the
//! traversal and filter semantics.
//!
//! ```
//! use arbor_scene::{Node, Scene};
//! use kurbo::Point;
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(Node::group().w(200.0).h(200.0));
//! let below = scene.spawn(root, Node::rect().w(100.0).h(100.0)).unwrap();
//! let above = scene.spawn(root, Node::rect().w(100.0).h(100.0)).unwrap();
//!
//! // Later siblings render in front and win hit tests.
//! assert_eq!(scene.topmost_at(root, Point::new(50.0, 50.0), None), Some(above));
//! assert_eq!(
//!     scene.nodes_at(root, Point::new(50.0, 50.0), None),
//!     vec![above, below],
//! );
//! ```

pub mod hit;
pub mod node;
pub mod tree;
pub mod types;

pub use hit::NodeFilter;
pub use node::{Kind, Node};
pub use tree::Scene;
pub use types::{NodeFlags, NodeId, RenderHandle, SceneError};
