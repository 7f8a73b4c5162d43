// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Stage: the top-level container of an arbor application.
//!
//! ## Overview
//!
//! A [`Stage`] owns the scene tree and the event router, wraps the root
//! node, and mirrors the window size into observable `width`/`height`
//! properties that applications bind node geometry to. The [`Platform`]
//! trait is the contract with the native presentation layer — window,
//! renderer, fonts, and the blocking run loop are all behind it and out of
//! scope for the core.
//!
//! A minimal embedding:
//!
//! ```no_run
//! use arbor_router::EventKind;
//! use arbor_scene::Node;
//! use arbor_stage::{Platform, Stage, run};
//!
//! fn main_with(platform: &mut impl Platform) {
//!     let mut stage = Stage::create(platform, 400.0, 400.0);
//!     let root = stage.scene_mut().insert(Node::group());
//!     stage.set_root(root).unwrap();
//!
//!     let button = stage
//!         .scene_mut()
//!         .spawn(root, Node::rect().w(100.0).h(50.0).mouse_events(true))
//!         .unwrap();
//!     stage.on(EventKind::Click, Some(button), |_, _| println!("clicked"));
//!
//!     run(&mut stage, platform).unwrap();
//! }
//! ```
//!
//! Starting a stage without a root is a fatal configuration error: the
//! event loop is never entered.

pub mod platform;
pub mod stage;

pub use platform::{FontHandle, Platform};
pub use stage::{Stage, StageError, run};
