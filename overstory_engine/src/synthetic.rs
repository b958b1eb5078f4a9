// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host for tests, demos, and benches.
//!
//! ## Overview
//!
//! [`SyntheticHost`] implements all three host traits over a plain rectangle
//! table: elements are opaque ids, geometry is set directly, ancestry and
//! scroll containers are declared, and subscription traffic is recorded so
//! resource discipline can be asserted. Cloning a host produces another
//! handle to the same shared state, so a test can hand one handle to the
//! engine and keep another to mutate geometry mid-scenario.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use kurbo::{Rect, Size};

use crate::types::{GeometrySource, ScrollAncestry, SubscriptionHost, WatchTarget};

#[derive(Debug)]
struct Shared<H> {
    rects: HashMap<H, Rect>,
    parents: HashMap<H, H>,
    scroll_containers: HashSet<H>,
    viewport: Size,
    active: Vec<WatchTarget<H>>,
    subscribes: usize,
    unsubscribes: usize,
}

/// Shared-state synthetic host over opaque element ids.
#[derive(Debug)]
pub struct SyntheticHost<H> {
    shared: Rc<RefCell<Shared<H>>>,
}

impl<H> Clone for SyntheticHost<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: Copy + Eq + Hash> SyntheticHost<H> {
    /// Create a host with the given viewport and no elements.
    pub fn new(viewport: Size) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                rects: HashMap::new(),
                parents: HashMap::new(),
                scroll_containers: HashSet::new(),
                viewport,
                active: Vec::new(),
                subscribes: 0,
                unsubscribes: 0,
            })),
        }
    }

    /// Set (or move) an element's bounding box.
    pub fn place(&self, el: H, rect: Rect) {
        self.shared.borrow_mut().rects.insert(el, rect);
    }

    /// Unmount an element; `measure` returns `None` for it afterwards.
    pub fn remove(&self, el: H) {
        self.shared.borrow_mut().rects.remove(&el);
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, viewport: Size) {
        self.shared.borrow_mut().viewport = viewport;
    }

    /// Declare `parent` as the parent of `child`.
    pub fn set_parent(&self, child: H, parent: H) {
        self.shared.borrow_mut().parents.insert(child, parent);
    }

    /// Mark an element as a scroll container (scrollable overflow with
    /// content exceeding its box).
    pub fn set_scroll_container(&self, el: H, scrollable: bool) {
        let mut shared = self.shared.borrow_mut();
        if scrollable {
            shared.scroll_containers.insert(el);
        } else {
            shared.scroll_containers.remove(&el);
        }
    }

    /// The subscriptions currently held, in subscription order.
    pub fn active_watches(&self) -> Vec<WatchTarget<H>> {
        self.shared.borrow().active.clone()
    }

    /// Total `subscribe` calls observed.
    pub fn subscribe_count(&self) -> usize {
        self.shared.borrow().subscribes
    }

    /// Total `unsubscribe` calls observed.
    pub fn unsubscribe_count(&self) -> usize {
        self.shared.borrow().unsubscribes
    }
}

impl<H: Copy + Eq + Hash> GeometrySource<H> for SyntheticHost<H> {
    fn measure(&self, el: &H) -> Option<Rect> {
        self.shared.borrow().rects.get(el).copied()
    }

    fn viewport(&self) -> Size {
        self.shared.borrow().viewport
    }
}

impl<H: Copy + Eq + Hash> ScrollAncestry<H> for SyntheticHost<H> {
    fn parent_of(&self, el: &H) -> Option<H> {
        self.shared.borrow().parents.get(el).copied()
    }

    fn is_scroll_container(&self, el: &H) -> bool {
        self.shared.borrow().scroll_containers.contains(el)
    }
}

impl<H: Copy + Eq + Hash> SubscriptionHost<H> for SyntheticHost<H> {
    fn subscribe(&mut self, target: WatchTarget<H>) {
        let mut shared = self.shared.borrow_mut();
        shared.subscribes += 1;
        shared.active.push(target);
    }

    fn unsubscribe(&mut self, target: WatchTarget<H>) {
        let mut shared = self.shared.borrow_mut();
        shared.unsubscribes += 1;
        if let Some(pos) = shared.active.iter().position(|t| *t == target) {
            shared.active.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let a: SyntheticHost<u32> = SyntheticHost::new(Size::new(800.0, 600.0));
        let b = a.clone();
        a.place(1, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(b.measure(&1), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        b.set_viewport(Size::new(400.0, 300.0));
        assert_eq!(a.viewport(), Size::new(400.0, 300.0));
    }

    #[test]
    fn records_subscription_traffic() {
        let h: SyntheticHost<u32> = SyntheticHost::new(Size::new(800.0, 600.0));
        let mut sink = h.clone();
        sink.subscribe(WatchTarget::ViewportResize);
        sink.subscribe(WatchTarget::ContainerScroll(3));
        assert_eq!(h.subscribe_count(), 2);
        assert_eq!(
            h.active_watches(),
            vec![WatchTarget::ViewportResize, WatchTarget::ContainerScroll(3)]
        );

        sink.unsubscribe(WatchTarget::ViewportResize);
        assert_eq!(h.unsubscribe_count(), 1);
        assert_eq!(h.active_watches(), vec![WatchTarget::ContainerScroll(3)]);
    }
}
