// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless tour of the input pipeline: press/release/click, drag capture,
//! scroll eligibility, and keyboard focus.
//!
//! A real embedding would implement [`Platform`] over a native window and a
//! renderer; here a scripted platform replays a canned pointer session so the
//! demo runs anywhere.
//!
//! Run:
//! - `cargo run -p arbor_demos --example interactive_buttons`

use arbor_router::{EventKind, RawEvent};
use arbor_scene::{Node, RenderHandle};
use arbor_stage::{FontHandle, Platform, Stage, run};

/// Platform stand-in that replays a scripted event sequence.
struct Scripted {
    size: (f64, f64),
    events: Vec<RawEvent>,
}

impl Platform for Scripted {
    fn window_size(&self) -> (f64, f64) {
        self.size
    }

    fn create_window(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        println!("[platform] window {width}x{height}");
    }

    fn set_root(&mut self, handle: Option<RenderHandle>) {
        println!("[platform] display root {handle:?}");
    }

    fn resolve_font(&self, _name: &str) -> Option<FontHandle> {
        None
    }

    fn register_font(&mut self, name: &str, path: &str) {
        println!("[platform] font {name} from {path}");
    }

    fn run_loop(&mut self, callback: &mut dyn FnMut(RawEvent)) {
        for event in self.events.drain(..) {
            callback(event);
        }
    }
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut platform = Scripted {
        size: (0.0, 0.0),
        events: vec![
            // Press and release on the click rect.
            RawEvent::pointer("press", 60.0, 60.0),
            RawEvent::pointer("release", 60.0, 60.0),
            // Drag the small red rect 40 to the right, 20 down.
            RawEvent::pointer("press", 310.0, 60.0),
            RawEvent::pointer("drag", 330.0, 60.0),
            RawEvent::pointer("drag", 350.0, 80.0),
            RawEvent::pointer("release", 350.0, 80.0),
            // Scroll over the scroll pane.
            RawEvent::scroll(420.0, 100.0, 0.0, 12.0),
            // Keys go to the focused overlay.
            RawEvent::key("key.press", 65, Some('a')),
            // A malformed event: logged and dropped.
            RawEvent {
                kind: "gesture.rotate".into(),
                ..RawEvent::default()
            },
        ],
    };

    let mut stage = Stage::create(&mut platform, 640.0, 480.0);
    let root = stage.scene_mut().insert(Node::group().id("root"));
    stage.set_root(root).unwrap();

    // A click target.
    let click_rect = stage
        .scene_mut()
        .spawn(
            root,
            Node::rect()
                .x(50.0)
                .y(50.0)
                .w(100.0)
                .h(50.0)
                .id("clickrect")
                .mouse_events(true),
        )
        .unwrap();
    stage.on(EventKind::Press, Some(click_rect), |_, _| {
        println!("[app] pressed");
    });
    stage.on(EventKind::Release, Some(click_rect), |_, _| {
        println!("[app] released");
    });
    stage.on(EventKind::Click, Some(click_rect), |_, _| {
        println!("[app] clicked");
    });

    // A draggable rect that follows the pointer.
    let drag_rect = stage
        .scene_mut()
        .spawn(
            root,
            Node::rect()
                .x(300.0)
                .y(50.0)
                .w(30.0)
                .h(30.0)
                .id("dragrect")
                .mouse_events(true),
        )
        .unwrap();
    stage.on(EventKind::Drag, Some(drag_rect), move |scene, event| {
        let delta = event.delta().unwrap();
        let node = scene.get_mut(drag_rect).unwrap();
        node.x.set(node.x.get() + delta.x);
        node.y.set(node.y.get() + delta.y);
        println!(
            "[app] dragged to ({}, {})",
            node.x.get(),
            node.y.get()
        );
    });

    // A scroll pane.
    let scroll_pane = stage
        .scene_mut()
        .spawn(
            root,
            Node::rect()
                .x(400.0)
                .y(50.0)
                .w(50.0)
                .h(200.0)
                .id("scroll")
                .scroll_events(true),
        )
        .unwrap();
    stage.on(EventKind::Scroll, Some(scroll_pane), move |scene, event| {
        let delta = event.delta().unwrap();
        let node = scene.get_mut(scroll_pane).unwrap();
        node.y.set(node.y.get() + delta.y);
        println!("[app] scrolled by {}", delta.y);
    });

    // Keyboard focus on an overlay that accepts keys.
    let overlay = stage
        .scene_mut()
        .spawn(
            root,
            Node::rect()
                .x(20.0)
                .y(20.0)
                .w(300.0)
                .h(300.0)
                .opacity(0.2)
                .id("overlay")
                .key_events(true),
        )
        .unwrap();
    stage.set_focus(Some(overlay));
    stage.on(EventKind::KeyPress, Some(overlay), |_, event| {
        println!("[app] key {:?}", event.payload);
    });

    // The root follows the window.
    let w = stage.scene().get(root).unwrap().w.clone();
    w.watch(|width| println!("[app] root width now {width}"));

    run(&mut stage, &mut platform).unwrap();

    println!("[app] find(\"dragrect\") = {:?}", stage.find("dragrect"));
}
