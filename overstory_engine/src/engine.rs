// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine implementation: intent wiring, two-phase resolve, emission.
//!
//! ## Overview
//!
//! [`OverlayEngine`] composes the hover-intent controller, the scroll/resize
//! watcher, and the placement resolver for one anchor/overlay pair:
//!
//! - Pointer traffic drives the intent machine; the watcher is attached when
//!   intent leaves `Closed` and detached the moment it returns there, so no
//!   subscriptions exist while the overlay is closed.
//! - Opening triggers the two-phase resolve: the first emitted
//!   [`PlacementResult`] has `visible == false` (mount invisibly), the next
//!   render frame measures the overlay's natural size, and only then is a
//!   placement resolved and revealed.
//! - Watch traffic re-resolves against a fresh [`GeometrySnapshot`]; an
//!   anchor scrolled out of its container suppresses visibility without
//!   touching intent state.
//!
//! ## Ordering
//!
//! [`OverlayEngine::process_tick`] handles intent-bearing events before
//! geometry events from the same tick, and drops invalidations made
//! irrelevant by a close.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use kurbo::Point;
use tracing::{debug, warn};

use overstory_intent::{HoverIntentController, IntentState};
use overstory_placement::{GeometrySnapshot, ResolveOptions, resolve};

use crate::types::{
    EngineConfig, EngineError, EngineEvent, GeometrySource, ListenerId, PlacementResult,
    PointerTarget, Schedule, ScrollAncestry, SubscriptionHost,
};
use crate::watcher::ScrollResizeWatcher;

type Listener = Box<dyn FnMut(&PlacementResult)>;

/// Overlay engine for one anchor/overlay pair.
///
/// ## Usage
///
/// - Construct with [`new`](Self::new) over a host implementing
///   [`GeometrySource`], [`ScrollAncestry`], and [`SubscriptionHost`].
/// - Attach the anchor, then the overlay
///   ([`attach_anchor`](Self::attach_anchor) /
///   [`attach_overlay`](Self::attach_overlay)).
/// - Deliver host traffic through [`handle_event`](Self::handle_event) (or
///   batched per tick through [`process_tick`](Self::process_tick)), then
///   re-read [`poll`](Self::poll) and arm what it asks for.
/// - [`subscribe`](Self::subscribe) to receive the [`PlacementResult`]
///   stream; the renderer applies it to actual pixels and opacity.
///
/// Each engine owns an independent intent controller and watcher; no state
/// is shared across pairs.
pub struct OverlayEngine<H, P> {
    host: P,
    config: EngineConfig,
    intent: HoverIntentController,
    watcher: ScrollResizeWatcher<H>,
    anchor: Option<H>,
    overlay: Option<H>,
    /// The overlay has been measured since it was last mounted.
    measured: bool,
    needs_frame: bool,
    last_result: Option<PlacementResult>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    disposed: bool,
}

impl<H: Copy + Eq, P> core::fmt::Debug for OverlayEngine<H, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("intent", &self.intent.state())
            .field("watcher", &self.watcher.is_attached())
            .field("measured", &self.measured)
            .field("needs_frame", &self.needs_frame)
            .field("last_result", &self.last_result)
            .field("listeners", &self.listeners.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl<H, P> OverlayEngine<H, P>
where
    H: Copy + Eq,
    P: GeometrySource<H> + ScrollAncestry<H> + SubscriptionHost<H>,
{
    /// Create an engine over `host` with nothing attached.
    pub fn new(host: P, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            intent: HoverIntentController::new(config.delays),
            watcher: ScrollResizeWatcher::new(),
            anchor: None,
            overlay: None,
            measured: false,
            needs_frame: false,
            last_result: None,
            listeners: Vec::new(),
            next_listener: 0,
            disposed: false,
        }
    }

    /// Attach the anchor element the overlay is positioned against.
    ///
    /// Re-attaching releases any held subscriptions and restarts intent from
    /// `Closed`: there is exactly one intent state per pair at any time.
    pub fn attach_anchor(&mut self, el: H) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        if self.anchor.is_some() {
            self.watcher.detach(&mut self.host);
            self.intent = HoverIntentController::new(self.config.delays);
            self.measured = false;
            self.needs_frame = false;
            self.last_result = None;
        }
        self.anchor = Some(el);
        Ok(())
    }

    /// Attach the floating overlay panel. The anchor must be attached first;
    /// anything else is a caller bug surfaced at configuration time.
    pub fn attach_overlay(&mut self, el: H) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        if self.anchor.is_none() {
            return Err(EngineError::OverlayBeforeAnchor);
        }
        self.overlay = Some(el);
        self.measured = false;
        Ok(())
    }

    /// Register a subscriber for the [`PlacementResult`] stream.
    pub fn subscribe(&mut self, listener: impl FnMut(&PlacementResult) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Current intent state.
    pub fn intent_state(&self) -> IntentState {
        self.intent.state()
    }

    /// The most recently emitted result, if any.
    pub fn last_result(&self) -> Option<&PlacementResult> {
        self.last_result.as_ref()
    }

    /// What the host should arm next: a single-shot deadline and/or one
    /// render-frame callback.
    pub fn poll(&self) -> Schedule {
        Schedule {
            deadline: self.intent.poll_deadline(),
            needs_frame: self.needs_frame,
        }
    }

    /// Change the external `open` flag (controlled mode). Equivalent to
    /// delivering [`EngineEvent::ExternalOpen`].
    pub fn set_open(&mut self, open: Option<bool>, now: Instant) {
        self.handle_event(EngineEvent::ExternalOpen(open), now);
    }

    /// Deliver one host event.
    pub fn handle_event(&mut self, event: EngineEvent, now: Instant) {
        if self.disposed || self.anchor.is_none() {
            return;
        }
        match event {
            EngineEvent::PointerEnter(target) => {
                if target == PointerTarget::Overlay && !self.config.stay_open_on_hover {
                    return;
                }
                let prev = self.intent.state();
                self.intent.on_pointer_enter(now);
                self.sync_intent(prev);
            }
            EngineEvent::PointerLeave(target) => {
                if target == PointerTarget::Overlay && !self.config.stay_open_on_hover {
                    return;
                }
                let prev = self.intent.state();
                self.intent.on_pointer_leave(now);
                self.sync_intent(prev);
            }
            EngineEvent::Timeout => {
                let prev = self.intent.state();
                self.intent.handle_timeout(now);
                self.sync_intent(prev);
            }
            EngineEvent::ExternalOpen(flag) => {
                let prev = self.intent.state();
                self.intent.set_external_open(flag);
                self.sync_intent(prev);
            }
            EngineEvent::Frame => self.on_frame(),
            EngineEvent::Invalidated(kind) => {
                if self.intent.state() == IntentState::Closed {
                    return;
                }
                debug!(?kind, "geometry invalidated");
                self.resolve_and_emit();
            }
        }
    }

    /// Deliver a batch of events that occurred in the same tick.
    ///
    /// Intent-bearing events are processed first (in their given order),
    /// then geometry events, unless intent ended up `Closed`, in which case
    /// the now-irrelevant geometry work is dropped.
    pub fn process_tick(&mut self, events: impl IntoIterator<Item = EngineEvent>, now: Instant) {
        let (intent_events, geometry_events): (Vec<_>, Vec<_>) =
            events.into_iter().partition(|e| e.is_intent());
        for event in intent_events {
            self.handle_event(event, now);
        }
        if self.intent.state() == IntentState::Closed {
            return;
        }
        for event in geometry_events {
            self.handle_event(event, now);
        }
    }

    /// Tear down: release subscriptions, dispose intent, drop subscribers.
    /// Idempotent; nothing is emitted.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.watcher.detach(&mut self.host);
        self.intent.dispose();
        self.listeners.clear();
        self.needs_frame = false;
        self.disposed = true;
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn sync_intent(&mut self, prev: IntentState) {
        let state = self.intent.state();
        if state == prev {
            return;
        }
        debug!(?prev, ?state, "intent transition");
        if prev == IntentState::Closed {
            self.activate();
        }
        if state == IntentState::Closed {
            self.deactivate();
            return;
        }
        if state == IntentState::Open {
            if self.measured {
                self.resolve_and_emit();
            } else {
                self.needs_frame = true;
            }
        }
    }

    /// Intent left `Closed`: hold resources and ask for the invisible mount.
    fn activate(&mut self) {
        let Some(anchor) = self.anchor else {
            return;
        };
        self.watcher.attach(&mut self.host, anchor);
        self.measured = false;
        self.needs_frame = true;
        let mount = PlacementResult {
            placement: self.last_result.map_or(self.config.placement, |r| r.placement),
            origin: self.last_result.map_or(Point::ZERO, |r| r.origin),
            visible: false,
        };
        self.emit(mount);
    }

    /// Intent returned to `Closed`: release resources, clear pending work.
    fn deactivate(&mut self) {
        self.watcher.detach(&mut self.host);
        self.needs_frame = false;
        self.measured = false;
        let result = PlacementResult {
            placement: self.last_result.map_or(self.config.placement, |r| r.placement),
            origin: self.last_result.map_or(Point::ZERO, |r| r.origin),
            visible: false,
        };
        self.emit(result);
    }

    /// The render frame after an invisible mount: measure the overlay's
    /// natural size, and reveal if intent is already confirmed.
    fn on_frame(&mut self) {
        if self.intent.state() == IntentState::Closed {
            self.needs_frame = false;
            return;
        }
        if !self.needs_frame {
            return;
        }
        let Some(overlay) = self.overlay else {
            return;
        };
        if self.host.measure(&overlay).is_some() {
            self.needs_frame = false;
            self.measured = true;
            if self.intent.state() == IntentState::Open {
                self.resolve_and_emit();
            }
        }
        // Unmeasurable overlay: keep requesting frames until it mounts.
    }

    /// Capture a snapshot, resolve, and emit. Unmounted geometry retains the
    /// previous result instead of emitting or failing.
    fn resolve_and_emit(&mut self) {
        let (Some(anchor), Some(overlay)) = (self.anchor, self.overlay) else {
            return;
        };
        let Some(anchor_rect) = self.host.measure(&anchor) else {
            debug!("anchor unmounted; retaining previous placement");
            return;
        };
        let Some(overlay_rect) = self.host.measure(&overlay) else {
            debug!("overlay unmounted; retaining previous placement");
            return;
        };
        let scroll_container = self
            .watcher
            .container()
            .and_then(|c| self.host.measure(&c));
        let snapshot = GeometrySnapshot {
            anchor: anchor_rect,
            overlay: overlay_rect,
            viewport: self.host.viewport(),
            scroll_container,
        };
        let options = ResolveOptions {
            allow_corners: self.config.allow_corners,
            margin: self.config.margin,
        };
        let resolution = resolve(&snapshot, self.config.placement, &options);
        let in_view = self.watcher.anchor_in_view(&self.host, anchor_rect);
        let visible = self.intent.state() == IntentState::Open && self.measured && in_view;
        self.emit(PlacementResult {
            placement: resolution.placement,
            origin: resolution.origin,
            visible,
        });
    }

    fn emit(&mut self, result: PlacementResult) {
        self.last_result = Some(result);
        for (id, listener) in &mut self.listeners {
            // A panicking subscriber is logged and skipped; the rest still
            // see the result.
            if catch_unwind(AssertUnwindSafe(|| listener(&result))).is_err() {
                warn!(listener = id.0, "placement listener panicked");
            }
        }
    }
}
