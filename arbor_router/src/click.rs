// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click synthesis: decide on release whether a press/release pair is a click.
//!
//! A press and release on the same node always click, regardless of how far
//! the pointer traveled in between. When the release resolves to a different
//! node (or to nothing) — the target moved, or the pointer slid off —
//! configurable spatial and temporal tolerances decide whether the user's
//! original intent still counts as a click on the pressed node.

use arbor_scene::NodeId;
use kurbo::Point;

/// State of an active pointer press.
#[derive(Clone, Copy, Debug)]
pub struct Press {
    /// Node the press resolved to.
    pub target: NodeId,
    /// Pointer position at press time, logical coordinates.
    pub position: Point,
    /// Press timestamp in milliseconds.
    pub time: u64,
    /// True once movement exceeded the spatial tolerance.
    pub moved_beyond: bool,
}

/// Press/release click recognizer.
///
/// Thresholds apply only when press and release targets differ; same-target
/// pairs always click. `None` disables the corresponding check: with both
/// thresholds `None`, only same-target pairs click.
#[derive(Clone, Debug)]
pub struct ClickTracker {
    press: Option<Press>,
    move_threshold: Option<f64>,
    time_threshold: Option<u64>,
}

impl ClickTracker {
    /// Default tolerances: 5 logical units of travel, 100 ms.
    pub fn new() -> Self {
        Self::with_thresholds(Some(5.0), Some(100))
    }

    /// Create with explicit spatial/temporal tolerances.
    pub fn with_thresholds(move_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            press: None,
            move_threshold,
            time_threshold,
        }
    }

    /// Record a press on `target`.
    pub fn on_down(&mut self, target: NodeId, position: Point, time: u64) {
        self.press = Some(Press {
            target,
            position,
            time,
            moved_beyond: false,
        });
    }

    /// Track pointer movement during the press; returns true when the
    /// spatial tolerance is newly exceeded.
    pub fn on_move(&mut self, position: Point) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        if press.moved_beyond {
            return false;
        }
        if let Some(threshold) = self.move_threshold
            && press.position.distance(position) > threshold
        {
            press.moved_beyond = true;
            return true;
        }
        false
    }

    /// Process a release and return the node to click, if any.
    pub fn on_up(&mut self, target: Option<NodeId>, position: Point, time: u64) -> Option<NodeId> {
        let press = self.press.take()?;

        // Fast path: released on the pressed node.
        if target == Some(press.target) {
            return Some(press.target);
        }

        // Different (or no) target: both thresholds disabled means never.
        if self.move_threshold.is_none() && self.time_threshold.is_none() {
            return None;
        }
        if press.moved_beyond {
            return None;
        }

        let distance_ok = self
            .move_threshold
            .is_none_or(|t| press.position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| time.saturating_sub(press.time) <= t);

        (distance_ok && time_ok).then_some(press.target)
    }

    /// Drop any active press without producing a click.
    pub fn cancel(&mut self) {
        self.press = None;
    }

    /// True while a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press> {
        self.press.as_ref()
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_scene::{Node, Scene};

    fn two_nodes() -> (NodeId, NodeId) {
        let mut scene = Scene::new();
        (scene.insert(Node::rect()), scene.insert(Node::rect()))
    }

    #[test]
    fn same_target_clicks_regardless_of_travel() {
        let (a, _) = two_nodes();
        let mut tracker = ClickTracker::new();

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        tracker.on_move(Point::new(500.0, 500.0));
        let clicked = tracker.on_up(Some(a), Point::new(600.0, 600.0), 5000);
        assert_eq!(clicked, Some(a));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn release_without_press_is_not_a_click() {
        let (a, _) = two_nodes();
        let mut tracker = ClickTracker::new();
        assert_eq!(tracker.on_up(Some(a), Point::ZERO, 0), None);
    }

    #[test]
    fn different_target_without_thresholds_never_clicks() {
        let (a, b) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(None, None);

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        assert_eq!(tracker.on_up(Some(b), Point::new(10.0, 20.0), 1001), None);
    }

    #[test]
    fn different_target_within_tolerance_clicks_original() {
        let (a, b) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(Some(5.0), Some(100));

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        // ~4.24 units and 50 ms later.
        let clicked = tracker.on_up(Some(b), Point::new(13.0, 23.0), 1050);
        assert_eq!(clicked, Some(a));
    }

    #[test]
    fn distance_beyond_tolerance_suppresses() {
        let (a, b) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(Some(5.0), None);

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        assert_eq!(tracker.on_up(Some(b), Point::new(20.0, 30.0), 1010), None);
    }

    #[test]
    fn elapsed_time_beyond_tolerance_suppresses() {
        let (a, b) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(None, Some(100));

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        assert_eq!(tracker.on_up(Some(b), Point::new(10.0, 20.0), 1200), None);
    }

    #[test]
    fn recorded_movement_blocks_cross_target_click() {
        let (a, b) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(Some(5.0), None);

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        assert!(tracker.on_move(Point::new(30.0, 40.0)));
        // Release close to the final position, but the press already moved
        // beyond tolerance.
        assert_eq!(tracker.on_up(Some(b), Point::new(31.0, 41.0), 1010), None);
    }

    #[test]
    fn movement_within_tolerance_reports_nothing() {
        let (a, _) = two_nodes();
        let mut tracker = ClickTracker::with_thresholds(Some(5.0), None);

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        assert!(!tracker.on_move(Point::new(12.0, 22.0)));
        // Only the first crossing reports.
        assert!(tracker.on_move(Point::new(40.0, 40.0)));
        assert!(!tracker.on_move(Point::new(80.0, 80.0)));
    }

    #[test]
    fn cancel_discards_the_press() {
        let (a, _) = two_nodes();
        let mut tracker = ClickTracker::new();

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        tracker.cancel();
        assert!(!tracker.is_pressed());
        assert_eq!(tracker.on_up(Some(a), Point::new(10.0, 20.0), 1010), None);
    }

    #[test]
    fn release_over_nothing_within_tolerance_clicks_original() {
        let (a, _) = two_nodes();
        let mut tracker = ClickTracker::new();

        tracker.on_down(a, Point::new(10.0, 20.0), 1000);
        let clicked = tracker.on_up(None, Point::new(11.0, 21.0), 1020);
        assert_eq!(clicked, Some(a));
    }
}
