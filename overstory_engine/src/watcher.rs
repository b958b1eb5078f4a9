// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll/resize watching: container discovery, subscription lifecycle,
//! anchor visibility.
//!
//! ## Overview
//!
//! [`ScrollResizeWatcher`] owns the subscriptions that keep a placement
//! fresh: scroll events on the anchor's nearest scroll container, a size
//! observer on that container, and viewport resize events. The subscriptions
//! themselves are host-side resources; the watcher asks for them through
//! [`SubscriptionHost`] and guarantees balanced subscribe/unsubscribe pairs.
//! Delivered traffic comes back to the engine as
//! [`EngineEvent::Invalidated`](crate::types::EngineEvent::Invalidated).
//!
//! ## Container discovery
//!
//! On attach, the watcher walks the anchor's ancestor chain and picks the
//! first ancestor that [`ScrollAncestry::is_scroll_container`] reports as
//! scrollable with overflowing content. Without one, only the viewport is
//! watched and the anchor is always considered in view.

use kurbo::Rect;
use tracing::debug;

use crate::types::{GeometrySource, ScrollAncestry, SubscriptionHost, WatchFlags, WatchTarget};

/// Owns the scroll/resize subscriptions for one anchor/overlay pair.
///
/// Detached by default; the engine attaches it when hover intent becomes
/// active and detaches it the moment intent returns to `Closed`.
/// [`detach`](Self::detach) is idempotent.
#[derive(Clone, Debug, Default)]
pub struct ScrollResizeWatcher<H> {
    container: Option<H>,
    active: WatchFlags,
}

impl<H: Copy + Eq> ScrollResizeWatcher<H> {
    /// Create a detached watcher.
    pub fn new() -> Self {
        Self {
            container: None,
            active: WatchFlags::empty(),
        }
    }

    /// Whether any subscriptions are currently held.
    pub fn is_attached(&self) -> bool {
        !self.active.is_empty()
    }

    /// The scroll container discovered on the last attach, if any.
    pub fn container(&self) -> Option<H> {
        self.container
    }

    /// The subscription set currently held.
    pub fn active(&self) -> WatchFlags {
        self.active
    }

    /// Discover the anchor's scroll container and establish subscriptions.
    ///
    /// Attaching an already attached watcher is a no-op; the engine detaches
    /// first when the anchor changes.
    pub fn attach<P>(&mut self, host: &mut P, anchor: H)
    where
        P: ScrollAncestry<H> + SubscriptionHost<H>,
    {
        if self.is_attached() {
            return;
        }
        self.container = find_scroll_container(host, anchor);
        if let Some(container) = self.container {
            host.subscribe(WatchTarget::ContainerScroll(container));
            self.active |= WatchFlags::CONTAINER_SCROLL;
            host.subscribe(WatchTarget::ContainerResize(container));
            self.active |= WatchFlags::CONTAINER_RESIZE;
        } else {
            debug!("no scroll container found; watching viewport only");
        }
        host.subscribe(WatchTarget::ViewportResize);
        self.active |= WatchFlags::VIEWPORT_RESIZE;
    }

    /// Release all subscriptions. Safe to call twice.
    pub fn detach<P: SubscriptionHost<H>>(&mut self, host: &mut P) {
        if let Some(container) = self.container {
            if self.active.contains(WatchFlags::CONTAINER_SCROLL) {
                host.unsubscribe(WatchTarget::ContainerScroll(container));
            }
            if self.active.contains(WatchFlags::CONTAINER_RESIZE) {
                host.unsubscribe(WatchTarget::ContainerResize(container));
            }
        }
        if self.active.contains(WatchFlags::VIEWPORT_RESIZE) {
            host.unsubscribe(WatchTarget::ViewportResize);
        }
        self.active = WatchFlags::empty();
        self.container = None;
    }

    /// Whether the anchor (at `anchor_rect`) still intersects the scroll
    /// container discovered on attach.
    ///
    /// Best-effort: without a container, or when the container cannot be
    /// measured, the anchor is considered in view (suppression requires
    /// positive evidence). Touching edges count as intersecting.
    pub fn anchor_in_view<G: GeometrySource<H>>(&self, source: &G, anchor_rect: Rect) -> bool {
        let Some(container) = self.container else {
            return true;
        };
        let Some(c) = source.measure(&container) else {
            return true;
        };
        let a = anchor_rect;
        !(a.y1 < c.y0 || a.y0 > c.y1 || a.x1 < c.x0 || a.x0 > c.x1)
    }
}

/// Nearest ancestor of `anchor` that is a scroll container.
fn find_scroll_container<H: Copy, A: ScrollAncestry<H>>(ancestry: &A, anchor: H) -> Option<H> {
    let mut cursor = ancestry.parent_of(&anchor);
    while let Some(el) = cursor {
        if ancestry.is_scroll_container(&el) {
            return Some(el);
        }
        cursor = ancestry.parent_of(&el);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticHost;
    use crate::types::NoScrollAncestors;
    use kurbo::Size;

    fn host() -> SyntheticHost<u32> {
        SyntheticHost::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn discovers_nearest_scroll_ancestor() {
        let h = host();
        let mut platform = h.clone();
        // anchor 1 -> plain parent 2 -> scrollable 3 -> scrollable 4
        h.set_parent(1, 2);
        h.set_parent(2, 3);
        h.set_parent(3, 4);
        h.set_scroll_container(3, true);
        h.set_scroll_container(4, true);

        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut platform, 1);
        assert_eq!(w.container(), Some(3));
        assert_eq!(
            w.active(),
            WatchFlags::CONTAINER_SCROLL | WatchFlags::CONTAINER_RESIZE | WatchFlags::VIEWPORT_RESIZE
        );
        assert_eq!(
            h.active_watches(),
            vec![
                WatchTarget::ContainerScroll(3),
                WatchTarget::ContainerResize(3),
                WatchTarget::ViewportResize,
            ]
        );
    }

    #[test]
    fn falls_back_to_viewport_without_container() {
        let h = host();
        let mut platform = h.clone();
        h.set_parent(1, 2);

        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut platform, 1);
        assert_eq!(w.container(), None);
        assert_eq!(w.active(), WatchFlags::VIEWPORT_RESIZE);
        assert_eq!(h.active_watches(), vec![WatchTarget::ViewportResize]);
    }

    #[test]
    fn detach_is_idempotent() {
        let h = host();
        let mut platform = h.clone();
        h.set_parent(1, 2);
        h.set_scroll_container(2, true);

        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut platform, 1);
        assert_eq!(h.subscribe_count(), 3);

        w.detach(&mut platform);
        assert!(h.active_watches().is_empty());
        assert_eq!(h.unsubscribe_count(), 3);
        assert!(!w.is_attached());

        // Second detach releases nothing twice.
        w.detach(&mut platform);
        assert_eq!(h.unsubscribe_count(), 3);
    }

    #[test]
    fn attach_twice_holds_one_subscription_set() {
        let h = host();
        let mut platform = h.clone();
        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut platform, 1);
        w.attach(&mut platform, 1);
        assert_eq!(h.subscribe_count(), 1);
        assert_eq!(h.active_watches(), vec![WatchTarget::ViewportResize]);
    }

    #[test]
    fn anchor_in_view_against_container() {
        let h = host();
        let mut platform = h.clone();
        h.set_parent(1, 2);
        h.set_scroll_container(2, true);
        h.place(2, Rect::new(0.0, 0.0, 300.0, 200.0));

        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut platform, 1);

        assert!(w.anchor_in_view(&h, Rect::new(10.0, 10.0, 60.0, 30.0)));
        // Scrolled fully below the container.
        assert!(!w.anchor_in_view(&h, Rect::new(10.0, 250.0, 60.0, 280.0)));
        // Touching the edge still counts.
        assert!(w.anchor_in_view(&h, Rect::new(10.0, 200.0, 60.0, 230.0)));
    }

    #[test]
    fn anchor_in_view_without_evidence() {
        let h = host();
        let mut platform = h.clone();
        let mut w = ScrollResizeWatcher::new();
        // No container at all.
        w.attach(&mut platform, 1);
        assert!(w.anchor_in_view(&h, Rect::new(-100.0, -100.0, -50.0, -80.0)));
    }

    #[test]
    fn no_ancestry_means_viewport_only() {
        // A host with no ancestor information degrades gracefully.
        struct Bare(SyntheticHost<u32>);
        impl SubscriptionHost<u32> for Bare {
            fn subscribe(&mut self, t: WatchTarget<u32>) {
                self.0.subscribe(t);
            }
            fn unsubscribe(&mut self, t: WatchTarget<u32>) {
                self.0.unsubscribe(t);
            }
        }
        impl ScrollAncestry<u32> for Bare {
            fn parent_of(&self, el: &u32) -> Option<u32> {
                NoScrollAncestors.parent_of(el)
            }
            fn is_scroll_container(&self, el: &u32) -> bool {
                NoScrollAncestors.is_scroll_container(el)
            }
        }

        let tracker = host();
        let mut bare = Bare(tracker.clone());
        let mut w = ScrollResizeWatcher::new();
        w.attach(&mut bare, 1);
        assert_eq!(w.container(), None);
        assert_eq!(tracker.active_watches(), vec![WatchTarget::ViewportResize]);
    }
}
