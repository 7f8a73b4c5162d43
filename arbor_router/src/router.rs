// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation: normalization, target resolution, dispatch.
//!
//! ## Overview
//!
//! The router turns raw platform events into targeted listener callbacks:
//!
//! 1. **Normalize** — validate the type tag and required fields, divide
//!    device coordinates by the DPI scale, stamp a timestamp. Malformed
//!    events are logged and dropped; router state is never corrupted.
//! 2. **Resolve** — hit-test the scene for the topmost eligible node
//!    (`MOUSE` flag for pointer events, `SCROLL` for scroll), or use the
//!    focus node for keyboard events. Containers are traversed regardless of
//!    their own flags.
//! 3. **Dispatch** — run target-specific listeners, then global listeners,
//!    in registration order within each group.
//!
//! ## Drag capture
//!
//! A press on a node captures it together with the press-time pointer
//! position. While captured, move events bypass hit testing entirely: they
//! are delivered to the captured node with a delta relative to the previous
//! pointer position, wherever the pointer is. Release ends the capture.
//!
//! ## Click synthesis
//!
//! Release runs the [`ClickTracker`]: press and release on the same node
//! synthesize a click on it; differing targets click within configurable
//! tolerances. Platform-delivered `click` events are routed as-is.

use std::time::Instant;

use arbor_scene::{Node, NodeFlags, NodeId, Scene};
use kurbo::{Point, Vec2};
use tracing::{debug, warn};

use crate::click::ClickTracker;
use crate::event::{Event, EventKind, Payload, RawEvent};
use crate::registry::{ListenerId, ListenerRegistry};

/// Active pointer capture.
#[derive(Clone, Copy, Debug)]
struct DragCapture {
    /// Node hit at press time; all moves go here until release.
    node: NodeId,
    /// Pointer position at press time.
    origin: Point,
    /// Pointer position at the previous event; deltas are relative to this.
    last: Point,
}

/// The event router.
///
/// Owns the listener registry and the press/drag/click/focus state machines.
/// Single-threaded and callback-driven: each [`Router::route`] call runs to
/// completion, invoking listeners inline.
pub struct Router {
    registry: ListenerRegistry,
    dpi_scale: f64,
    drag: Option<DragCapture>,
    click: ClickTracker,
    focus: Option<NodeId>,
    epoch: Instant,
}

impl core::fmt::Debug for Router {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("dpi_scale", &self.dpi_scale)
            .field("captured", &self.drag.as_ref().map(|d| d.node))
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn accepts_mouse(n: &Node) -> bool {
    n.flags().contains(NodeFlags::MOUSE)
}

fn accepts_scroll(n: &Node) -> bool {
    n.flags().contains(NodeFlags::SCROLL)
}

impl Router {
    /// Create a router with DPI scale 1.0 and default click tolerances.
    pub fn new() -> Self {
        Self {
            registry: ListenerRegistry::new(),
            dpi_scale: 1.0,
            drag: None,
            click: ClickTracker::new(),
            focus: None,
            epoch: Instant::now(),
        }
    }

    /// The current DPI scale factor.
    pub fn dpi_scale(&self) -> f64 {
        self.dpi_scale
    }

    /// Set the DPI scale factor. Non-positive values are rejected and logged.
    pub fn set_dpi_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.dpi_scale = scale;
        } else {
            warn!(scale, "ignoring non-positive DPI scale");
        }
    }

    /// Register a listener; `target = None` listens globally.
    pub fn on(
        &mut self,
        kind: EventKind,
        target: Option<NodeId>,
        cb: impl FnMut(&mut Scene, &Event) + 'static,
    ) -> ListenerId {
        self.registry.on(kind, target, cb)
    }

    /// Remove a listener.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.registry.off(id)
    }

    /// The keyboard focus node, if designated.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Designate (or clear) the keyboard focus node.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.focus = node;
    }

    /// The node currently holding pointer capture, if any.
    pub fn captured(&self) -> Option<NodeId> {
        self.drag.as_ref().map(|d| d.node)
    }

    /// The press-time pointer position of the active capture, if any.
    pub fn capture_origin(&self) -> Option<Point> {
        self.drag.as_ref().map(|d| d.origin)
    }

    /// Replace the click recognizer (to change its tolerances).
    pub fn set_click_tracker(&mut self, tracker: ClickTracker) {
        self.click = tracker;
    }

    /// Validate and normalize a raw platform event.
    ///
    /// Coordinates and resize extents are divided by the DPI scale and a
    /// timestamp is stamped. Returns `None` — after logging — for unknown
    /// type tags or missing required fields.
    pub fn normalize(&self, raw: &RawEvent) -> Option<Event> {
        let time = u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX);
        let payload = match raw.kind.as_str() {
            "press" => Payload::Press {
                position: self.position_of(raw)?,
            },
            "release" => Payload::Release {
                position: self.position_of(raw)?,
            },
            "click" => Payload::Click {
                position: self.position_of(raw)?,
            },
            "drag" => Payload::Drag {
                position: self.position_of(raw)?,
                // Relative to the previous pointer position; filled in during
                // routing while captured.
                delta: Vec2::ZERO,
            },
            "scroll" => Payload::Scroll {
                position: self.position_of(raw)?,
                delta: Vec2::new(raw.dx.unwrap_or(0.0), raw.dy.unwrap_or(0.0)),
            },
            "key.press" => Payload::KeyPress {
                keycode: self.keycode_of(raw)?,
                printable: raw.printable,
            },
            "key.release" => Payload::KeyRelease {
                keycode: self.keycode_of(raw)?,
                printable: raw.printable,
            },
            "windowsize" => {
                let (Some(width), Some(height)) = (raw.width, raw.height) else {
                    warn!(kind = %raw.kind, "resize event missing extents, dropping");
                    return None;
                };
                Payload::WindowSize {
                    width: width / self.dpi_scale,
                    height: height / self.dpi_scale,
                }
            }
            other => {
                warn!(kind = %other, "unknown event type, dropping");
                return None;
            }
        };
        Some(Event {
            time,
            target: None,
            payload,
        })
    }

    fn position_of(&self, raw: &RawEvent) -> Option<Point> {
        let (Some(x), Some(y)) = (raw.x, raw.y) else {
            warn!(kind = %raw.kind, "event missing coordinates, dropping");
            return None;
        };
        Some(Point::new(x / self.dpi_scale, y / self.dpi_scale))
    }

    fn keycode_of(&self, raw: &RawEvent) -> Option<u32> {
        let Some(keycode) = raw.keycode else {
            warn!(kind = %raw.kind, "key event missing keycode, dropping");
            return None;
        };
        Some(keycode)
    }

    /// Normalize `raw` and dispatch it against the tree under `root`.
    ///
    /// Listeners run synchronously and may mutate the scene; targets are
    /// resolved before the first callback runs. Returns the primary
    /// dispatched event (a synthesized click is dispatched in addition),
    /// or `None` when the raw event was dropped.
    pub fn route(&mut self, scene: &mut Scene, root: NodeId, raw: &RawEvent) -> Option<Event> {
        let mut event = self.normalize(raw)?;
        match event.payload {
            Payload::Press { position } => {
                let target = scene.topmost_at(root, position, Some(&accepts_mouse));
                if let Some(node) = target {
                    self.drag = Some(DragCapture {
                        node,
                        origin: position,
                        last: position,
                    });
                    self.click.on_down(node, position, event.time);
                    debug!(?node, "pointer captured");
                }
                self.dispatch(scene, target, &mut event);
            }
            Payload::Drag { position, .. } => {
                // Not captured: the platform reported movement without an
                // active press. Nothing to deliver.
                let Some(capture) = self.drag.as_mut() else {
                    return Some(event);
                };
                let delta = position - capture.last;
                capture.last = position;
                let node = capture.node;
                self.click.on_move(position);
                event.payload = Payload::Drag { position, delta };
                self.dispatch(scene, Some(node), &mut event);
            }
            Payload::Release { position } => {
                if let Some(capture) = self.drag.take() {
                    debug!(node = ?capture.node, "pointer capture ends");
                }
                let target = scene.topmost_at(root, position, Some(&accepts_mouse));
                self.dispatch(scene, target, &mut event);
                if let Some(clicked) = self.click.on_up(target, position, event.time) {
                    let mut click = Event {
                        time: event.time,
                        target: None,
                        payload: Payload::Click { position },
                    };
                    self.dispatch(scene, Some(clicked), &mut click);
                }
            }
            Payload::Click { position } => {
                let target = scene.topmost_at(root, position, Some(&accepts_mouse));
                self.dispatch(scene, target, &mut event);
            }
            Payload::Scroll { position, .. } => {
                let target = scene.topmost_at(root, position, Some(&accepts_scroll));
                self.dispatch(scene, target, &mut event);
            }
            Payload::KeyPress { .. } | Payload::KeyRelease { .. } => {
                let target = self.focus.filter(|id| {
                    scene
                        .get(*id)
                        .is_some_and(|n| n.flags().contains(NodeFlags::KEYS))
                });
                self.dispatch(scene, target, &mut event);
            }
            Payload::WindowSize { .. } => {
                self.dispatch(scene, None, &mut event);
            }
        }
        Some(event)
    }

    /// Deliver one event: target listeners, then global, registration order
    /// within each group.
    fn dispatch(&mut self, scene: &mut Scene, target: Option<NodeId>, event: &mut Event) {
        event.target = target;
        let calls = self.registry.snapshot(event.payload.kind(), target);
        for call in calls {
            (&mut *call.borrow_mut())(scene, event);
        }
    }
}
