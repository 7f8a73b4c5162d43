// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event types: the raw platform contract and the normalized form.

use arbor_scene::NodeId;
use kurbo::{Point, Vec2};

/// A raw event as delivered by the native platform layer.
///
/// The platform contract is loose by design: a string type tag plus whatever
/// type-specific fields the event carries, in device pixels. Normalization
/// (see [`Router::normalize`]) validates the tag and required fields; a
/// malformed event is logged and dropped without disturbing router state.
///
/// [`Router::normalize`]: crate::Router::normalize
#[derive(Clone, Debug, Default)]
pub struct RawEvent {
    /// Type tag: one of `press`, `release`, `click`, `drag`, `scroll`,
    /// `key.press`, `key.release`, `windowsize`.
    pub kind: String,
    /// Pointer x in device pixels.
    pub x: Option<f64>,
    /// Pointer y in device pixels.
    pub y: Option<f64>,
    /// Horizontal delta (scroll).
    pub dx: Option<f64>,
    /// Vertical delta (scroll).
    pub dy: Option<f64>,
    /// New window width in device pixels (resize).
    pub width: Option<f64>,
    /// New window height in device pixels (resize).
    pub height: Option<f64>,
    /// Key code (keyboard).
    pub keycode: Option<u32>,
    /// Printable character, if the key produces one.
    pub printable: Option<char>,
}

impl RawEvent {
    /// A positional event (`press`, `release`, `click`, `drag`).
    pub fn pointer(kind: &str, x: f64, y: f64) -> Self {
        Self {
            kind: kind.into(),
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A scroll event at a position with a wheel delta.
    pub fn scroll(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self {
            kind: "scroll".into(),
            x: Some(x),
            y: Some(y),
            dx: Some(dx),
            dy: Some(dy),
            ..Self::default()
        }
    }

    /// A keyboard event (`key.press` or `key.release`).
    pub fn key(kind: &str, keycode: u32, printable: Option<char>) -> Self {
        Self {
            kind: kind.into(),
            keycode: Some(keycode),
            printable,
            ..Self::default()
        }
    }

    /// A window resize event.
    pub fn window_size(width: f64, height: f64) -> Self {
        Self {
            kind: "windowsize".into(),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }
}

/// Fieldless event discriminant; the listener-registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer button down.
    Press,
    /// Pointer button up.
    Release,
    /// Synthesized or platform-delivered click.
    Click,
    /// Pointer movement while captured.
    Drag,
    /// Wheel/trackpad scroll.
    Scroll,
    /// Key down.
    KeyPress,
    /// Key up.
    KeyRelease,
    /// Window resized.
    WindowSize,
}

/// Type-specific payload of a normalized event, in logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload {
    /// Pointer button down at a position.
    Press {
        /// Logical pointer position.
        position: Point,
    },
    /// Pointer button up at a position.
    Release {
        /// Logical pointer position.
        position: Point,
    },
    /// Click at a position.
    Click {
        /// Logical pointer position.
        position: Point,
    },
    /// Captured pointer movement.
    Drag {
        /// Logical pointer position.
        position: Point,
        /// Movement relative to the previous pointer event.
        delta: Vec2,
    },
    /// Scroll at a position.
    Scroll {
        /// Logical pointer position.
        position: Point,
        /// Wheel delta.
        delta: Vec2,
    },
    /// Key down.
    KeyPress {
        /// Platform key code.
        keycode: u32,
        /// Printable character, if any.
        printable: Option<char>,
    },
    /// Key up.
    KeyRelease {
        /// Platform key code.
        keycode: u32,
        /// Printable character, if any.
        printable: Option<char>,
    },
    /// Window resized, extents in logical units.
    WindowSize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
}

impl Payload {
    /// The registry key for this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Press { .. } => EventKind::Press,
            Self::Release { .. } => EventKind::Release,
            Self::Click { .. } => EventKind::Click,
            Self::Drag { .. } => EventKind::Drag,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::KeyPress { .. } => EventKind::KeyPress,
            Self::KeyRelease { .. } => EventKind::KeyRelease,
            Self::WindowSize { .. } => EventKind::WindowSize,
        }
    }
}

/// A normalized event as seen by listeners.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Milliseconds since the router was created, stamped at normalization.
    pub time: u64,
    /// The node the event was delivered to, `None` for global delivery.
    pub target: Option<NodeId>,
    /// Type-specific data.
    pub payload: Payload,
}

impl Event {
    /// The pointer position, for positional payloads.
    pub fn position(&self) -> Option<Point> {
        match self.payload {
            Payload::Press { position }
            | Payload::Release { position }
            | Payload::Click { position }
            | Payload::Drag { position, .. }
            | Payload::Scroll { position, .. } => Some(position),
            _ => None,
        }
    }

    /// The movement or wheel delta, for drag/scroll payloads.
    pub fn delta(&self) -> Option<Vec2> {
        match self.payload {
            Payload::Drag { delta, .. } | Payload::Scroll { delta, .. } => Some(delta),
            _ => None,
        }
    }
}
