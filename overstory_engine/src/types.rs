// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the engine: host traits, events, configuration, results.
//!
//! ## Overview
//!
//! The engine is platform-agnostic. Everything it needs from the host UI
//! layer comes through three small traits over an opaque element handle `H`:
//! [`GeometrySource`] (bounding-box reads), [`ScrollAncestry`] (ancestor
//! walks for scroll-container discovery), and [`SubscriptionHost`]
//! (subscribe/unsubscribe side effects). A DOM-backed host wraps the
//! platform's queries; tests use the in-memory
//! [`SyntheticHost`](crate::synthetic::SyntheticHost).

use std::time::Instant;

use kurbo::{Point, Rect, Size};
use overstory_intent::IntentDelays;
use overstory_placement::{DEFAULT_MARGIN, Placement};
use thiserror::Error;

/// Bounding-box reads supplied by the host.
///
/// `measure` wraps the platform's bounding-box query; returning `None` means
/// the element is not currently mounted (the engine then retains its last
/// known result instead of resolving).
pub trait GeometrySource<H> {
    /// Viewport-relative bounding box of an element, if mounted.
    fn measure(&self, el: &H) -> Option<Rect>;
    /// Size of the logical viewport.
    fn viewport(&self) -> Size;
}

/// Ancestor information used to locate the anchor's scroll container.
pub trait ScrollAncestry<H> {
    /// The parent of `el`, or `None` at the root.
    fn parent_of(&self, el: &H) -> Option<H>;
    /// Whether `el`'s computed overflow is scrollable *and* its content
    /// exceeds its box.
    fn is_scroll_container(&self, el: &H) -> bool;
}

/// An ancestry provider with no ancestors; the watcher falls back to
/// watching the viewport only.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoScrollAncestors;

impl<H> ScrollAncestry<H> for NoScrollAncestors {
    #[inline]
    fn parent_of(&self, _el: &H) -> Option<H> {
        None
    }

    #[inline]
    fn is_scroll_container(&self, _el: &H) -> bool {
        false
    }
}

/// One subscription the watcher asks the host to establish or release.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WatchTarget<H> {
    /// Scroll events on the scroll container.
    ContainerScroll(H),
    /// A size observer on the scroll container.
    ContainerResize(H),
    /// Resize events on the viewport.
    ViewportResize,
}

/// Subscription side effects performed by the host on the watcher's behalf.
///
/// `unsubscribe` receives exactly the targets previously passed to
/// `subscribe`; the watcher guarantees balanced pairs even when its own
/// detach is called twice.
pub trait SubscriptionHost<H> {
    /// Establish a subscription; deliver matching traffic back as
    /// [`EngineEvent::Invalidated`].
    fn subscribe(&mut self, target: WatchTarget<H>);
    /// Release a previously established subscription.
    fn unsubscribe(&mut self, target: WatchTarget<H>);
}

bitflags::bitflags! {
    /// The set of subscriptions a watcher currently holds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WatchFlags: u8 {
        /// Scroll events on the scroll container.
        const CONTAINER_SCROLL = 0b0000_0001;
        /// A size observer on the scroll container.
        const CONTAINER_RESIZE = 0b0000_0010;
        /// Resize events on the viewport.
        const VIEWPORT_RESIZE  = 0b0000_0100;
    }
}

/// Which element a raw pointer signal refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerTarget {
    /// The anchor element.
    Anchor,
    /// The overlay panel. Only meaningful with
    /// [`EngineConfig::stay_open_on_hover`]; ignored otherwise.
    Overlay,
}

/// The geometry change behind an invalidation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Invalidation {
    /// The scroll container scrolled.
    ContainerScrolled,
    /// The scroll container changed size.
    ContainerResized,
    /// The viewport changed size.
    ViewportResized,
}

/// An input delivered to [`OverlayEngine::handle_event`](crate::engine::OverlayEngine::handle_event).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EngineEvent {
    /// Raw pointer entered the anchor or overlay.
    PointerEnter(PointerTarget),
    /// Raw pointer left the anchor or overlay.
    PointerLeave(PointerTarget),
    /// A deadline previously exposed through
    /// [`Schedule::deadline`] fired.
    Timeout,
    /// The render frame requested through [`Schedule::needs_frame`] is being
    /// painted; the overlay can now be measured.
    Frame,
    /// A watch subscription delivered traffic.
    Invalidated(Invalidation),
    /// The external `open` flag changed (controlled mode); `None` hands
    /// control back to the intent machine.
    ExternalOpen(Option<bool>),
}

impl EngineEvent {
    /// Whether this event drives the intent state machine (as opposed to
    /// geometry). Within one tick, intent events are processed before
    /// geometry events.
    pub fn is_intent(self) -> bool {
        matches!(
            self,
            Self::PointerEnter(_) | Self::PointerLeave(_) | Self::Timeout | Self::ExternalOpen(_)
        )
    }
}

/// What the host should arm after the current batch of events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Arm a single-shot timer and deliver [`EngineEvent::Timeout`] when it
    /// fires. Replaces any previously armed deadline.
    pub deadline: Option<Instant>,
    /// Deliver one [`EngineEvent::Frame`] on the next render frame (the
    /// overlay has been mounted invisibly and awaits measurement).
    pub needs_frame: bool,
}

/// Engine configuration, supplied once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Preferred placement; fallback ordering is seeded from it.
    pub placement: Placement,
    /// Enter/leave/skip debounce windows.
    pub delays: IntentDelays,
    /// Consider corner placements when `placement` is a corner.
    pub allow_corners: bool,
    /// Gap between anchor and overlay along the primary axis.
    pub margin: f64,
    /// Treat pointer enter/leave on the overlay itself as hover intent, so
    /// the pointer can travel from the anchor onto the overlay without
    /// closing it.
    pub stay_open_on_hover: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Top,
            delays: IntentDelays::default(),
            allow_corners: false,
            margin: DEFAULT_MARGIN,
            stay_open_on_hover: false,
        }
    }
}

/// One positioning decision, streamed to engine subscribers.
///
/// `visible == false` doubles as the mount/unmount instruction of the
/// two-phase resolve: the renderer mounts the overlay invisibly on the first
/// result after opening begins, and `origin` carries no meaning until a
/// result with `visible == true` arrives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementResult {
    /// The resolved placement.
    pub placement: Placement,
    /// Viewport-relative top-left corner for the overlay.
    pub origin: Point,
    /// Whether the overlay should currently be shown.
    pub visible: bool,
}

/// Handle for a registered engine subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Misuse of the engine API, detectable at configuration time.
///
/// Runtime conditions (unmounted elements, missing space) never surface
/// here; they degrade to a safe visual state instead.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineError {
    /// [`attach_overlay`](crate::engine::OverlayEngine::attach_overlay) was
    /// called before [`attach_anchor`](crate::engine::OverlayEngine::attach_anchor).
    #[error("overlay attached before anchor")]
    OverlayBeforeAnchor,
    /// The engine has been disposed and no longer accepts attachments.
    #[error("engine has been disposed")]
    Disposed,
}
