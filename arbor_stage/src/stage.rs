// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage: top-level container tying scene, router, and window together.

use arbor_reactive::Property;
use arbor_router::{Event, EventKind, ListenerId, RawEvent, Router};
use arbor_scene::{Node, NodeId, Scene};
use thiserror::Error;
use tracing::{debug, warn};

use crate::platform::Platform;

/// Stage configuration errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// [`Stage::start`] was called before a root was set; the event loop
    /// must not be entered.
    #[error("no root node set on the stage")]
    NoRoot,
    /// The root id does not refer to a live node.
    #[error("root node id is stale")]
    StaleRoot,
}

/// Top-level container: owns the scene and the router, wraps the root node,
/// and mirrors the window size into observable properties.
///
/// ## Size propagation
///
/// `width` and `height` are ordinary [`Property`] handles. An application
/// that wants its tree to follow the window binds node properties to them:
///
/// ```
/// use arbor_scene::Node;
/// use arbor_stage::Stage;
///
/// let mut stage = Stage::new(400.0, 400.0);
/// let root = stage.scene_mut().insert(Node::group());
/// stage.set_root(root).unwrap();
///
/// let panel = stage.scene_mut().spawn(root, Node::rect()).unwrap();
/// let w = stage.scene().get(panel).unwrap().w.clone();
/// w.bind_to(&stage.width).unwrap();
/// ```
///
/// On a window-resize event the stage updates `width`/`height` (propagating
/// through any bindings) and additionally resizes the root node directly,
/// before the event reaches application listeners.
#[derive(Debug)]
pub struct Stage {
    scene: Scene,
    router: Router,
    root: Option<NodeId>,
    /// Window width in logical units.
    pub width: Property<f64>,
    /// Window height in logical units.
    pub height: Property<f64>,
}

impl Stage {
    /// Create a stage with an initial logical size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scene: Scene::new(),
            router: Router::new(),
            root: None,
            width: Property::new(width),
            height: Property::new(height),
        }
    }

    /// Create the native window and a stage of the same size.
    pub fn create(platform: &mut impl Platform, width: f64, height: f64) -> Self {
        platform.create_window(width, height);
        Self::new(width, height)
    }

    /// The scene tree.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene tree, mutable.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The event router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The event router, mutable.
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// The root node id, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root node. Fails for stale ids.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), StageError> {
        if !self.scene.is_alive(id) {
            return Err(StageError::StaleRoot);
        }
        self.root = Some(id);
        Ok(())
    }

    /// Register a listener; `target = None` listens globally.
    pub fn on(
        &mut self,
        kind: EventKind,
        target: Option<NodeId>,
        cb: impl FnMut(&mut Scene, &Event) + 'static,
    ) -> ListenerId {
        self.router.on(kind, target, cb)
    }

    /// Remove a listener.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.router.off(id)
    }

    /// Designate (or clear) the keyboard focus node.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.router.set_focus(node);
    }

    /// Pre-order depth-first search from the root for a node with the given
    /// user id; `None` when absent or no root is set. Duplicate ids resolve
    /// to the pre-order-first match.
    pub fn find(&self, ident: &str) -> Option<NodeId> {
        self.scene.find(self.root?, ident)
    }

    /// Validate configuration and synchronize with the platform before the
    /// event loop is entered.
    ///
    /// Fails with [`StageError::NoRoot`] when no root is set — a fatal
    /// configuration error. Otherwise adopts the platform's DPI scale, hands
    /// the root's render handle to the platform, and processes one window
    /// size event so sizes line up.
    pub fn start(&mut self, platform: &mut impl Platform) -> Result<(), StageError> {
        let root = self.root.ok_or(StageError::NoRoot)?;
        if !self.scene.is_alive(root) {
            return Err(StageError::StaleRoot);
        }
        self.router.set_dpi_scale(platform.dpi_scale());
        platform.set_root(self.scene.get(root).and_then(Node::handle));

        let (w, h) = platform.window_size();
        self.process_event(&RawEvent::window_size(w, h));
        debug!(width = w, height = h, "stage started");
        Ok(())
    }

    /// Process one raw platform event to completion.
    ///
    /// Window-size events update the stage's size properties and resize the
    /// root node before listeners run; everything else goes straight to the
    /// router. Events arriving before a root is set are logged and dropped.
    pub fn process_event(&mut self, raw: &RawEvent) -> Option<Event> {
        let Some(root) = self.root else {
            warn!(kind = %raw.kind, "event before a root was set, dropping");
            return None;
        };
        if raw.kind == "windowsize"
            && let (Some(width), Some(height)) = (raw.width, raw.height)
        {
            let scale = self.router.dpi_scale();
            self.apply_window_size(width / scale, height / scale);
        }
        self.router.route(&mut self.scene, root, raw)
    }

    fn apply_window_size(&mut self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
        if let Some(root) = self.root
            && let Some(node) = self.scene.get_mut(root)
        {
            node.w.set(width);
            node.h.set(height);
        }
    }
}

/// Drive a stage with a platform: validate, then enter the blocking loop.
///
/// Returns before entering the loop when the stage is misconfigured.
pub fn run(stage: &mut Stage, platform: &mut impl Platform) -> Result<(), StageError> {
    stage.start(platform)?;
    platform.run_loop(&mut |raw| {
        stage.process_event(&raw);
    });
    Ok(())
}
