// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Reactive: observable properties with watchers and one-way bindings.
//!
//! ## Overview
//!
//! A [`Property<T>`] is a named-by-position value slot that applications can
//! read, write, watch, and bind. Writing a property synchronously invokes its
//! watchers in registration order. Binding a property to a source establishes
//! one-way continuous synchronization: whenever the source changes, the bound
//! property is updated to match *before* its own watchers fire, so bindings
//! chain.
//!
//! Properties are cheap handles (`Rc`-backed) designed for single-threaded,
//! callback-driven UI cores: scene nodes expose them as public fields, and
//! application callbacks capture clones.
//!
//! ```
//! use arbor_reactive::Property;
//!
//! let width = Property::new(100.0_f64);
//! let mirror = Property::new(0.0_f64);
//! mirror.bind_to(&width).unwrap();
//!
//! width.set(640.0);
//! assert_eq!(mirror.get(), 640.0);
//! ```
//!
//! ## Cycles
//!
//! The binding graph must stay acyclic. [`Property::bind_to`] walks the
//! source's upstream chain and reports [`BindError::Cycle`] instead of
//! installing a binding that would recurse forever.
//!
//! ## Re-entrant writes
//!
//! A watcher may write back into the property that is currently notifying.
//! The nested write stores the value (last writer wins) but does not re-enter
//! notification, so watcher fan-out always terminates.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;

/// Error returned by [`Property::bind_to`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The requested binding would make the binding graph cyclic, directly or
    /// transitively.
    #[error("binding would create a cycle in the property graph")]
    Cycle,
}

/// Handle for a watcher registered with [`Property::watch`].
///
/// Pass it back to [`Property::unwatch`] to remove the watcher. Handles are
/// only meaningful for the property that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription(u64);

type WatchFn<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Watcher<T> {
    id: u64,
    call: WatchFn<T>,
}

struct Binding<T> {
    source: Weak<RefCell<Inner<T>>>,
    watch: Subscription,
}

struct Inner<T> {
    value: T,
    watchers: Vec<Watcher<T>>,
    next_watch: u64,
    binding: Option<Binding<T>>,
    /// Set while watchers are being invoked; nested writes skip notification.
    notifying: bool,
}

/// A watchable value slot with at most one upstream binding.
///
/// `Property` is a shared handle: cloning it yields another handle to the
/// same slot, and equality compares identity, not value.
pub struct Property<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for Property<T> {}

impl<T: core::fmt::Debug> core::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Property")
            .field("value", &inner.value)
            .field("watchers", &inner.watchers.len())
            .field("bound", &inner.binding.is_some())
            .finish()
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Property<T> {
    /// Create a property holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                watchers: Vec::new(),
                next_watch: 0,
                binding: None,
                notifying: false,
            })),
        }
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Register a watcher invoked synchronously after every write, in
    /// registration order, with the new value.
    pub fn watch(&self, cb: impl FnMut(&T) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_watch;
        inner.next_watch += 1;
        inner.watchers.push(Watcher {
            id,
            call: Rc::new(RefCell::new(cb)),
        });
        Subscription(id)
    }

    /// Remove a watcher. Unknown or already-removed handles are ignored.
    pub fn unwatch(&self, sub: Subscription) {
        self.inner.borrow_mut().watchers.retain(|w| w.id != sub.0);
    }

    /// True if this property currently mirrors another property.
    pub fn is_bound(&self) -> bool {
        self.inner.borrow().binding.is_some()
    }

    /// Drop the upstream binding, if any. The current value is kept.
    pub fn unbind(&self) {
        let binding = self.inner.borrow_mut().binding.take();
        if let Some(b) = binding
            && let Some(source) = b.source.upgrade()
        {
            Self { inner: source }.unwatch(b.watch);
        }
    }
}

impl<T: Clone + 'static> Property<T> {
    /// Read the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Store `value`, then invoke all watchers in registration order.
    ///
    /// Writes issued from inside a watcher of this same property update the
    /// stored value but do not re-enter notification.
    pub fn set(&self, value: T) {
        let (calls, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            if inner.notifying {
                return;
            }
            inner.notifying = true;
            let calls: Vec<WatchFn<T>> = inner.watchers.iter().map(|w| Rc::clone(&w.call)).collect();
            (calls, inner.value.clone())
        };
        for call in calls {
            (&mut *call.borrow_mut())(&value);
        }
        self.inner.borrow_mut().notifying = false;
    }

    /// Bind this property to `source`: one-way, continuous.
    ///
    /// The source's current value is propagated immediately, and every later
    /// write to the source updates this property (firing its watchers) before
    /// control returns to the source's remaining watchers' caller. Rebinding
    /// replaces any previous binding.
    ///
    /// Fails with [`BindError::Cycle`] when `source` is this property or is
    /// itself bound, transitively, to this property.
    pub fn bind_to(&self, source: &Self) -> Result<(), BindError> {
        let mut cur = Some(Rc::clone(&source.inner));
        while let Some(rc) = cur {
            if Rc::ptr_eq(&rc, &self.inner) {
                return Err(BindError::Cycle);
            }
            let next = rc.borrow().binding.as_ref().and_then(|b| b.source.upgrade());
            cur = next;
        }

        self.unbind();

        let weak = Rc::downgrade(&self.inner);
        let watch = source.watch(move |v: &T| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.set(v.clone());
            }
        });
        self.inner.borrow_mut().binding = Some(Binding {
            source: Rc::downgrade(&source.inner),
            watch,
        });
        self.set(source.get());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_roundtrip() {
        let p = Property::new(7_i32);
        assert_eq!(p.get(), 7);
        p.set(42);
        assert_eq!(p.get(), 42);
    }

    #[test]
    fn watchers_fire_in_registration_order() {
        let p = Property::new(0_i32);
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        p.watch(move |v| o.borrow_mut().push(('a', *v)));
        let o = Rc::clone(&order);
        p.watch(move |v| o.borrow_mut().push(('b', *v)));

        p.set(5);
        assert_eq!(*order.borrow(), vec![('a', 5), ('b', 5)]);
    }

    #[test]
    fn unwatch_removes_watcher() {
        let p = Property::new(0_i32);
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let sub = p.watch(move |_| h.set(h.get() + 1));

        p.set(1);
        p.unwatch(sub);
        p.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn binding_propagates_and_fires_once_per_change() {
        let a = Property::new(0_i32);
        let b = Property::new(0_i32);
        a.bind_to(&b).unwrap();

        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        a.watch(move |_| f.set(f.get() + 1));

        b.set(10);
        assert_eq!(a.get(), 10);
        assert_eq!(fired.get(), 1);

        b.set(11);
        assert_eq!(a.get(), 11);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn bind_propagates_current_value_immediately() {
        let source = Property::new(640.0_f64);
        let mirror = Property::new(0.0_f64);
        mirror.bind_to(&source).unwrap();
        assert_eq!(mirror.get(), 640.0);
    }

    #[test]
    fn chained_bindings_propagate_through() {
        let a = Property::new(0_i32);
        let b = Property::new(0_i32);
        let c = Property::new(0_i32);
        b.bind_to(&a).unwrap();
        c.bind_to(&b).unwrap();

        a.set(3);
        assert_eq!(b.get(), 3);
        assert_eq!(c.get(), 3);
    }

    #[test]
    fn bound_value_updates_before_downstream_watchers_fire() {
        // A watcher on the bound property must observe the already-updated
        // value when the source changes.
        let source = Property::new(0_i32);
        let bound = Property::new(0_i32);
        bound.bind_to(&source).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let b = bound.clone();
        bound.watch(move |v| s.borrow_mut().push((*v, b.get())));

        source.set(9);
        assert_eq!(*seen.borrow(), vec![(9, 9)]);
    }

    #[test]
    fn direct_cycle_is_rejected() {
        let a = Property::new(0_i32);
        assert_eq!(a.bind_to(&a), Err(BindError::Cycle));
    }

    #[test]
    fn transitive_cycle_is_rejected() {
        let a = Property::new(0_i32);
        let b = Property::new(0_i32);
        let c = Property::new(0_i32);
        b.bind_to(&a).unwrap();
        c.bind_to(&b).unwrap();
        assert_eq!(a.bind_to(&c), Err(BindError::Cycle));
        // The failed bind must not have installed anything.
        assert!(!a.is_bound());
        c.set(99);
        assert_eq!(a.get(), 0);
    }

    #[test]
    fn unbind_stops_propagation() {
        let a = Property::new(0_i32);
        let b = Property::new(0_i32);
        a.bind_to(&b).unwrap();
        b.set(1);
        assert_eq!(a.get(), 1);

        a.unbind();
        assert!(!a.is_bound());
        b.set(2);
        assert_eq!(a.get(), 1);
    }

    #[test]
    fn rebinding_replaces_previous_source() {
        let a = Property::new(0_i32);
        let b = Property::new(1_i32);
        let c = Property::new(2_i32);

        a.bind_to(&b).unwrap();
        a.bind_to(&c).unwrap();
        assert_eq!(a.get(), 2);

        b.set(10);
        assert_eq!(a.get(), 2);
        c.set(20);
        assert_eq!(a.get(), 20);
    }

    #[test]
    fn nested_set_from_watcher_terminates() {
        let p = Property::new(0_i32);
        let fired = Rc::new(Cell::new(0));

        let f = Rc::clone(&fired);
        let q = p.clone();
        p.watch(move |v| {
            f.set(f.get() + 1);
            if *v < 100 {
                // Clamp from inside the watcher; must not recurse.
                q.set(100);
            }
        });

        p.set(1);
        assert_eq!(fired.get(), 1);
        assert_eq!(p.get(), 100);
    }

    #[test]
    fn mutual_watcher_writes_terminate() {
        let a = Property::new(0_i32);
        let b = Property::new(0_i32);

        let bb = b.clone();
        a.watch(move |v| bb.set(*v));
        let aa = a.clone();
        b.watch(move |v| aa.set(*v + 1));

        a.set(5);
        assert_eq!(b.get(), 5);
        // b's watcher wrote back into a while a was notifying: the value
        // sticks but no second notification round runs.
        assert_eq!(a.get(), 6);
    }

    #[test]
    fn dropped_source_leaves_bound_value_in_place() {
        let a = Property::new(0_i32);
        {
            let b = Property::new(4_i32);
            a.bind_to(&b).unwrap();
            b.set(5);
        }
        assert_eq!(a.get(), 5);
        // Unbinding after the source is gone is a no-op.
        a.unbind();
        assert!(!a.is_bound());
    }

    #[test]
    fn property_equality_is_identity() {
        let a = Property::new(1_i32);
        let b = Property::new(1_i32);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
