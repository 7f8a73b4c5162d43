// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene nodes: geometry properties, shape kinds, local containment.

use arbor_reactive::Property;
use kurbo::Point;
use smallvec::SmallVec;

use crate::types::{NodeFlags, NodeId, RenderHandle};

/// Shape-specific data for a node.
#[derive(Debug)]
pub enum Kind {
    /// Pure layout container. Never a hit target itself; with
    /// [`NodeFlags::CLIP`] its `[0,w]x[0,h]` box prunes hit testing.
    Group,
    /// Axis-aligned rectangle `[0,w]x[0,h]`.
    Rect,
    /// Circle centered at the local origin.
    Circle {
        /// Radius in local units.
        radius: Property<f64>,
    },
    /// Simple polygon, even-odd filled.
    Polygon {
        /// Ordered vertex list in local coordinates.
        vertices: Vec<Point>,
    },
    /// Text block, hit-tested as its `[0,w]x[0,h]` box.
    Text {
        /// Displayed string.
        content: String,
        /// Font size in local units.
        font_size: f64,
    },
    /// Image view, hit-tested as its `[0,w]x[0,h]` box.
    Image {
        /// Source path, passed through to the asset-loading collaborator.
        src: Option<String>,
    },
}

/// A node in the scene tree.
///
/// Geometry is exposed as public [`Property`] fields so applications can
/// read, watch, and bind them directly (`node.w.bind_to(&stage.width)`).
/// Structural links (`parent`, `children`) are owned by the [`Scene`] and
/// only mutated through it.
///
/// Construction is builder-style; the setters consume and return `self` so
/// nodes chain fluently before insertion:
///
/// ```
/// use arbor_scene::Node;
///
/// let rect = Node::rect().x(50.0).y(50.0).w(100.0).h(50.0).id("clickrect");
/// assert_eq!(rect.x.get(), 50.0);
/// ```
///
/// [`Scene`]: crate::Scene
#[derive(Debug)]
pub struct Node {
    pub(crate) ident: Option<String>,
    pub(crate) handle: Option<RenderHandle>,
    /// Position of the local origin in the parent's space.
    pub x: Property<f64>,
    /// Position of the local origin in the parent's space.
    pub y: Property<f64>,
    /// Horizontal scale applied to the subtree.
    pub sx: Property<f64>,
    /// Vertical scale applied to the subtree.
    pub sy: Property<f64>,
    /// Width of the node's local box.
    pub w: Property<f64>,
    /// Height of the node's local box.
    pub h: Property<f64>,
    /// Opacity in `[0,1]`; a rendering hint, not consulted by hit testing.
    pub opacity: Property<f64>,
    /// Visibility gates rendering and excludes the entire subtree from hit
    /// testing when false.
    pub visible: Property<bool>,
    pub(crate) flags: NodeFlags,
    pub(crate) kind: Kind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl Node {
    fn with_kind(kind: Kind) -> Self {
        Self {
            ident: None,
            handle: None,
            x: Property::new(0.0),
            y: Property::new(0.0),
            sx: Property::new(1.0),
            sy: Property::new(1.0),
            w: Property::new(0.0),
            h: Property::new(0.0),
            opacity: Property::new(1.0),
            visible: Property::new(true),
            flags: NodeFlags::default(),
            kind,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Create a group (container) node.
    pub fn group() -> Self {
        Self::with_kind(Kind::Group)
    }

    /// Create a rectangle node.
    pub fn rect() -> Self {
        Self::with_kind(Kind::Rect)
    }

    /// Create a circle node with the given radius.
    pub fn circle(radius: f64) -> Self {
        Self::with_kind(Kind::Circle {
            radius: Property::new(radius),
        })
    }

    /// Create a polygon node from an ordered vertex list.
    pub fn polygon(vertices: Vec<Point>) -> Self {
        Self::with_kind(Kind::Polygon { vertices })
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_kind(Kind::Text {
            content: content.into(),
            font_size: 20.0,
        })
    }

    /// Create an image-view node.
    pub fn image() -> Self {
        Self::with_kind(Kind::Image { src: None })
    }

    // Builder-style setters, usable before insertion.

    /// Set the x position.
    pub fn x(self, v: f64) -> Self {
        self.x.set(v);
        self
    }

    /// Set the y position.
    pub fn y(self, v: f64) -> Self {
        self.y.set(v);
        self
    }

    /// Set the horizontal scale.
    pub fn sx(self, v: f64) -> Self {
        self.sx.set(v);
        self
    }

    /// Set the vertical scale.
    pub fn sy(self, v: f64) -> Self {
        self.sy.set(v);
        self
    }

    /// Set the width.
    pub fn w(self, v: f64) -> Self {
        self.w.set(v);
        self
    }

    /// Set the height.
    pub fn h(self, v: f64) -> Self {
        self.h.set(v);
        self
    }

    /// Set the opacity.
    pub fn opacity(self, v: f64) -> Self {
        self.opacity.set(v);
        self
    }

    /// Set visibility.
    pub fn visible(self, v: bool) -> Self {
        self.visible.set(v);
        self
    }

    /// Set the user id. Ids are not required to be unique.
    pub fn id(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }

    /// Accept pointer press/release/click/drag events.
    pub fn mouse_events(mut self, accept: bool) -> Self {
        self.flags.set(NodeFlags::MOUSE, accept);
        self
    }

    /// Accept scroll events.
    pub fn scroll_events(mut self, accept: bool) -> Self {
        self.flags.set(NodeFlags::SCROLL, accept);
        self
    }

    /// Accept keyboard events (focus eligibility).
    pub fn key_events(mut self, accept: bool) -> Self {
        self.flags.set(NodeFlags::KEYS, accept);
        self
    }

    /// Clip the subtree to this node's `[0,w]x[0,h]` box during hit testing.
    pub fn clip(mut self, clip: bool) -> Self {
        self.flags.set(NodeFlags::CLIP, clip);
        self
    }

    /// Set the font size. Ignored on non-text nodes.
    pub fn font_size(mut self, size: f64) -> Self {
        if let Kind::Text { font_size, .. } = &mut self.kind {
            *font_size = size;
        }
        self
    }

    /// Set the image source path. Ignored on non-image nodes.
    pub fn src(mut self, path: impl Into<String>) -> Self {
        if let Kind::Image { src } = &mut self.kind {
            *src = Some(path.into());
        }
        self
    }

    // Post-insertion accessors.

    /// The user id, if any.
    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    /// Shape-specific data.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Shape-specific data, mutable.
    pub fn kind_mut(&mut self) -> &mut Kind {
        &mut self.kind
    }

    /// Current flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Replace the flags; returns `self` for chaining.
    pub fn set_flags(&mut self, flags: NodeFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// The renderer handle, if the native collaborator attached one.
    pub fn handle(&self) -> Option<RenderHandle> {
        self.handle
    }

    /// Attach or clear the renderer handle; returns `self` for chaining.
    pub fn set_handle(&mut self, handle: Option<RenderHandle>) -> &mut Self {
        self.handle = handle;
        self
    }

    /// The parent id, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in z-order (last is front-most).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True for group (container) nodes.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, Kind::Group)
    }

    /// Map a point from the parent's space into this node's local space.
    pub(crate) fn to_local(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.x.get()) / self.sx.get(),
            (pt.y - self.y.get()) / self.sy.get(),
        )
    }

    /// Map a point from this node's local space into the parent's space.
    pub(crate) fn to_parent(&self, pt: Point) -> Point {
        Point::new(
            pt.x * self.sx.get() + self.x.get(),
            pt.y * self.sy.get() + self.y.get(),
        )
    }

    fn box_contains(&self, pt: Point) -> bool {
        pt.x >= 0.0 && pt.x <= self.w.get() && pt.y >= 0.0 && pt.y <= self.h.get()
    }

    /// Shape containment test in local coordinates.
    ///
    /// Groups always return false: a container is never itself a hit target.
    /// Clip bounds participate in traversal pruning, not in matching.
    pub fn contains(&self, pt: Point) -> bool {
        match &self.kind {
            Kind::Group => false,
            Kind::Rect | Kind::Text { .. } | Kind::Image { .. } => self.box_contains(pt),
            Kind::Circle { radius } => {
                let r = radius.get();
                pt.x * pt.x + pt.y * pt.y <= r * r
            }
            Kind::Polygon { vertices } => polygon_contains(vertices, pt),
        }
    }

    /// True when this node clips and the local point lies outside its box.
    pub(crate) fn clip_rejects(&self, pt: Point) -> bool {
        self.flags.contains(NodeFlags::CLIP) && !self.box_contains(pt)
    }
}

/// Even-odd (crossing number) point-in-polygon test.
fn polygon_contains(vertices: &[Point], pt: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > pt.y) != (b.y > pt.y) {
            let x_cross = (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x;
            if pt.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_containment() {
        let r = Node::rect().w(100.0).h(50.0);
        assert!(r.contains(Point::new(50.0, 25.0)));
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(100.0, 50.0)));
        assert!(!r.contains(Point::new(150.0, 10.0)));
        assert!(!r.contains(Point::new(-1.0, 10.0)));
    }

    #[test]
    fn circle_containment_is_euclidean() {
        let c = Node::circle(50.0);
        assert!(c.contains(Point::new(49.0, 0.0)));
        assert!(c.contains(Point::new(50.0, 0.0)));
        assert!(!c.contains(Point::new(51.0, 0.0)));
        // A corner of the bounding box is outside the disk.
        assert!(!c.contains(Point::new(40.0, 40.0)));
    }

    #[test]
    fn polygon_containment_even_odd() {
        let p = Node::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 100.0),
        ]);
        assert!(p.contains(Point::new(50.0, 10.0)));
        assert!(!p.contains(Point::new(0.0, 100.0)));
        assert!(!p.contains(Point::new(101.0, 0.0)));
    }

    #[test]
    fn degenerate_polygon_matches_nothing() {
        let p = Node::polygon(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert!(!p.contains(Point::new(5.0, 0.0)));
    }

    #[test]
    fn group_is_never_a_hit_target() {
        let g = Node::group().w(100.0).h(100.0);
        assert!(!g.contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn text_and_image_hit_as_boxes() {
        let t = Node::text("hello").w(300.0).h(160.0);
        assert!(t.contains(Point::new(10.0, 10.0)));
        assert!(!t.contains(Point::new(301.0, 10.0)));

        let iv = Node::image().w(100.0).h(50.0);
        assert!(iv.contains(Point::new(99.0, 49.0)));
        assert!(!iv.contains(Point::new(99.0, 51.0)));
    }

    #[test]
    fn clip_rejection_uses_box_and_flag() {
        let clipping = Node::group().w(50.0).h(50.0).clip(true);
        assert!(clipping.clip_rejects(Point::new(60.0, 10.0)));
        assert!(!clipping.clip_rejects(Point::new(10.0, 10.0)));

        let plain = Node::group().w(50.0).h(50.0);
        assert!(!plain.clip_rejects(Point::new(60.0, 10.0)));
    }

    #[test]
    fn local_transform_roundtrip() {
        let n = Node::rect().x(10.0).y(20.0).sx(2.0).sy(4.0);
        let p = Point::new(33.0, 41.0);
        let local = n.to_local(p);
        let back = n.to_parent(local);
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn builder_chains() {
        let n = Node::rect()
            .x(50.0)
            .y(60.0)
            .w(100.0)
            .h(50.0)
            .id("clickrect")
            .mouse_events(true);
        assert_eq!(n.ident(), Some("clickrect"));
        assert!(n.flags().contains(NodeFlags::MOUSE));
        assert!(!n.flags().contains(NodeFlags::SCROLL));
        assert_eq!(n.x.get(), 50.0);
    }
}
