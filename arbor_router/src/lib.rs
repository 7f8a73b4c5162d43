// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Router: turns raw platform input into targeted scene callbacks.
//!
//! ## Overview
//!
//! The native presentation layer delivers one loosely-typed [`RawEvent`] per
//! invocation. The [`Router`] normalizes it (DPI scaling, timestamping,
//! validation — malformed events are logged and dropped), resolves the
//! target node with the scene's front-to-back hit tester, runs the
//! press/drag/release capture machine and click recognizer, and dispatches
//! to listeners registered in the [`ListenerRegistry`].
//!
//! ```
//! use arbor_router::{EventKind, RawEvent, Router};
//! use arbor_scene::{Node, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(Node::group().w(200.0).h(200.0));
//! let button = scene
//!     .spawn(root, Node::rect().w(100.0).h(50.0).mouse_events(true))
//!     .unwrap();
//!
//! let mut router = Router::new();
//! router.on(EventKind::Press, Some(button), |_scene, event| {
//!     println!("pressed at {:?}", event.position());
//! });
//!
//! let delivered = router.route(&mut scene, root, &RawEvent::pointer("press", 50.0, 25.0));
//! assert_eq!(delivered.unwrap().target, Some(button));
//! ```
//!
//! Everything is single-threaded and synchronous: each `route` call
//! processes its event to completion, and listener callbacks run inline with
//! `&mut Scene` access.

pub mod click;
pub mod event;
pub mod registry;
pub mod router;

pub use click::ClickTracker;
pub use event::{Event, EventKind, Payload, RawEvent};
pub use registry::{ListenerFn, ListenerId, ListenerRegistry, Target};
pub use router::Router;
