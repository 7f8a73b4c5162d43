// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walk the hit tester by hand: nested transforms, clip pruning, z-order,
//! and the property-binding layer, without a router in the way.
//!
//! Run:
//! - `cargo run -p arbor_demos --example hit_explorer`

use arbor_reactive::Property;
use arbor_scene::{Node, Scene};
use kurbo::Point;

fn main() {
    let mut scene = Scene::new();
    let root = scene.insert(Node::group().id("root").w(400.0).h(400.0));

    // A scaled group: everything inside renders at 2x.
    let zoomed = scene
        .spawn(root, Node::group().id("zoomed").x(100.0).y(100.0).sx(2.0).sy(2.0))
        .unwrap();
    let disc = scene
        .spawn(zoomed, Node::circle(20.0).id("disc").x(50.0).y(50.0))
        .unwrap();

    // A clipping panel with a child that pokes outside its box.
    let panel = scene
        .spawn(root, Node::group().id("panel").w(80.0).h(80.0).clip(true))
        .unwrap();
    let sticker = scene
        .spawn(panel, Node::rect().id("sticker").x(60.0).y(60.0).w(50.0).h(50.0))
        .unwrap();

    // A triangle in front of the disc.
    let wedge = scene
        .spawn(
            zoomed,
            Node::polygon(vec![
                Point::new(30.0, 30.0),
                Point::new(70.0, 30.0),
                Point::new(50.0, 70.0),
            ])
            .id("wedge"),
        )
        .unwrap();

    let name = |scene: &Scene, id| {
        scene
            .get(id)
            .and_then(|n| n.ident().map(str::to_owned))
            .unwrap_or_else(|| format!("{id:?}"))
    };

    // The disc's center in global space: local (0,0) of the disc node.
    let center = scene.local_to_global(Point::ZERO, disc);
    println!("disc center in global space: {center:?}");
    println!(
        "... and back to disc-local: {:?}",
        scene.global_to_local(center, disc)
    );

    // Everything under the pointer, front-most first.
    for pt in [center, Point::new(70.0, 70.0), Point::new(230.0, 230.0)] {
        let all = scene.nodes_at(root, pt, None);
        let names: Vec<_> = all.iter().map(|id| name(&scene, *id)).collect();
        let top = scene.topmost_at(root, pt, None);
        println!(
            "at {pt:?}: all = {names:?}, topmost = {:?}",
            top.map(|id| name(&scene, id))
        );
    }

    // The sticker extends past the panel's 80x80 clip box: reachable inside,
    // pruned outside.
    println!(
        "sticker at (70,70): {:?}",
        scene.topmost_at(root, Point::new(70.0, 70.0), None) == Some(sticker)
    );
    println!(
        "sticker at (105,105): {:?} (clipped away)",
        scene.topmost_at(root, Point::new(105.0, 105.0), None)
    );

    // Properties chain: mirror the wedge's x into a standalone property.
    let mirror = Property::new(0.0_f64);
    mirror.bind_to(&scene.get(wedge).unwrap().x).unwrap();
    mirror.watch(|v| println!("wedge.x is now {v}"));
    scene.get(wedge).unwrap().x.set(25.0);
    println!("mirror reads {}", mirror.get());
}
