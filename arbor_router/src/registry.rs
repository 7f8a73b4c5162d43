// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry: an ordered multimap keyed by event kind and target.

use std::cell::RefCell;
use std::rc::Rc;

use arbor_scene::{NodeId, Scene};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::event::{Event, EventKind};

/// Listener callback: runs synchronously inside dispatch and may mutate the
/// scene and node properties.
pub type ListenerFn = dyn FnMut(&mut Scene, &Event);

pub(crate) type Callback = Rc<RefCell<ListenerFn>>;

/// Handle for a registered listener; pass to [`ListenerRegistry::off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registration key: a specific node, or the global wildcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Listeners delivered when the event resolves to this node.
    Node(NodeId),
    /// Listeners delivered for every event of the kind, after any
    /// target-specific listeners.
    Global,
}

impl From<Option<NodeId>> for Target {
    fn from(node: Option<NodeId>) -> Self {
        match node {
            Some(id) => Self::Node(id),
            None => Self::Global,
        }
    }
}

struct Entry {
    id: ListenerId,
    call: Callback,
}

/// Ordered multimap from `(event kind, target)` to callbacks.
///
/// Registration order is preserved per key and determines dispatch order
/// among listeners on the same key. Target-specific listeners always run
/// before global ones for the same event.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<(EventKind, Target), Vec<Entry>>,
    next_id: u64,
}

impl core::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.listeners.len())
            .field("listeners", &total)
            .finish_non_exhaustive()
    }
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `kind` on `target` (`None` = global).
    pub fn on(
        &mut self,
        kind: EventKind,
        target: Option<NodeId>,
        cb: impl FnMut(&mut Scene, &Event) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry((kind, target.into()))
            .or_default()
            .push(Entry {
                id,
                call: Rc::new(RefCell::new(cb)),
            });
        id
    }

    /// Remove a listener. Returns false for unknown handles.
    ///
    /// Detaching a subtree does not deregister its listeners; callers that
    /// care should remove them here.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        self.listeners.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            removed |= entries.len() != before;
            !entries.is_empty()
        });
        removed
    }

    /// Snapshot the callbacks for one delivery: target-specific first, then
    /// global, registration order within each group.
    ///
    /// Snapshotting (cloning the `Rc`s) means a callback that registers or
    /// removes listeners mid-dispatch never mutates a list being iterated.
    pub(crate) fn snapshot(
        &self,
        kind: EventKind,
        target: Option<NodeId>,
    ) -> SmallVec<[Callback; 4]> {
        let mut out = SmallVec::new();
        if let Some(id) = target
            && let Some(entries) = self.listeners.get(&(kind, Target::Node(id)))
        {
            out.extend(entries.iter().map(|e| Rc::clone(&e.call)));
        }
        if let Some(entries) = self.listeners.get(&(kind, Target::Global)) {
            out.extend(entries.iter().map(|e| Rc::clone(&e.call)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_scene::Node;
    use kurbo::Point;

    use crate::event::Payload;

    fn press_event() -> Event {
        Event {
            time: 0,
            target: None,
            payload: Payload::Press {
                position: Point::ZERO,
            },
        }
    }

    fn run_all(registry: &ListenerRegistry, kind: EventKind, target: Option<NodeId>) {
        let mut scene = Scene::new();
        let event = press_event();
        for call in registry.snapshot(kind, target) {
            (&mut *call.borrow_mut())(&mut scene, &event);
        }
    }

    #[test]
    fn target_listeners_run_before_global_in_registration_order() {
        let mut scene = Scene::new();
        let node = scene.insert(Node::rect());

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        let o = Rc::clone(&order);
        registry.on(EventKind::Press, None, move |_, _| o.borrow_mut().push("g1"));
        let o = Rc::clone(&order);
        registry.on(EventKind::Press, Some(node), move |_, _| {
            o.borrow_mut().push("t1");
        });
        let o = Rc::clone(&order);
        registry.on(EventKind::Press, Some(node), move |_, _| {
            o.borrow_mut().push("t2");
        });
        let o = Rc::clone(&order);
        registry.on(EventKind::Press, None, move |_, _| o.borrow_mut().push("g2"));

        run_all(&registry, EventKind::Press, Some(node));
        assert_eq!(*order.borrow(), vec!["t1", "t2", "g1", "g2"]);
    }

    #[test]
    fn global_dispatch_skips_target_listeners() {
        let mut scene = Scene::new();
        let node = scene.insert(Node::rect());

        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        let h = Rc::clone(&hits);
        registry.on(EventKind::Press, Some(node), move |_, _| {
            h.borrow_mut().push("target");
        });
        let h = Rc::clone(&hits);
        registry.on(EventKind::Press, None, move |_, _| {
            h.borrow_mut().push("global");
        });

        run_all(&registry, EventKind::Press, None);
        assert_eq!(*hits.borrow(), vec!["global"]);
    }

    #[test]
    fn kinds_are_isolated() {
        let hits = Rc::new(RefCell::new(0_u32));
        let mut registry = ListenerRegistry::new();

        let h = Rc::clone(&hits);
        registry.on(EventKind::Scroll, None, move |_, _| *h.borrow_mut() += 1);

        run_all(&registry, EventKind::Press, None);
        assert_eq!(*hits.borrow(), 0);
        run_all(&registry, EventKind::Scroll, None);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_removes_a_single_listener() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        let h = Rc::clone(&hits);
        let first = registry.on(EventKind::Press, None, move |_, _| {
            h.borrow_mut().push("first");
        });
        let h = Rc::clone(&hits);
        registry.on(EventKind::Press, None, move |_, _| {
            h.borrow_mut().push("second");
        });

        assert!(registry.off(first));
        assert!(!registry.off(first));

        run_all(&registry, EventKind::Press, None);
        assert_eq!(*hits.borrow(), vec!["second"]);
    }
}
