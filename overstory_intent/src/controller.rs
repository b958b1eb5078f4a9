// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller implementation: transitions, deadlines, listener notification.
//!
//! ## Overview
//!
//! Converts raw pointer enter/leave signals into debounced open/close
//! decisions. The controller never reads a clock: every operation takes an
//! explicit `now`, and pending work is surfaced as a deadline through
//! [`HoverIntentController::poll_deadline`] that the host arms and fires back
//! via [`HoverIntentController::handle_timeout`]. This keeps every transition
//! deterministic and directly testable with synthetic timestamps.
//!
//! ## Deadlines
//!
//! At most one deadline is pending at any time; its meaning is implied by the
//! state (`Opening` → open deadline, `Closing` → close deadline). Scheduling
//! a new deadline always replaces the previous one, so enter/leave timers can
//! never overlap for one anchor.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use tracing::{debug, warn};

use crate::types::{IntentDelays, IntentState, SubscriberId};

type Listener = Box<dyn FnMut(IntentState)>;

/// Debounced hover-intent state machine for one anchor/overlay pair.
///
/// ## Usage
///
/// - Feed raw pointer signals via [`on_pointer_enter`](Self::on_pointer_enter)
///   and [`on_pointer_leave`](Self::on_pointer_leave).
/// - After every call, re-read [`poll_deadline`](Self::poll_deadline) and arm
///   a single-shot timer; when it fires, call
///   [`handle_timeout`](Self::handle_timeout).
/// - [`subscribe`](Self::subscribe) to observe visible-state changes
///   (`Open`, and `Closed` after having been visible).
/// - An external `open` flag ([`set_external_open`](Self::set_external_open))
///   pins the state and makes pointer signals no-ops (controlled mode).
pub struct HoverIntentController {
    state: IntentState,
    delays: IntentDelays,
    deadline: Option<Instant>,
    last_close: Option<Instant>,
    external: Option<bool>,
    listeners: Vec<(SubscriberId, Listener)>,
    next_subscriber: u64,
    disposed: bool,
}

impl core::fmt::Debug for HoverIntentController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HoverIntentController")
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .field("external", &self.external)
            .field("listeners", &self.listeners.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl Default for HoverIntentController {
    fn default() -> Self {
        Self::new(IntentDelays::default())
    }
}

impl HoverIntentController {
    /// Create a controller in the `Closed` state.
    pub fn new(delays: IntentDelays) -> Self {
        Self {
            state: IntentState::Closed,
            delays,
            deadline: None,
            last_close: None,
            external: None,
            listeners: Vec::new(),
            next_subscriber: 0,
            disposed: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> IntentState {
        self.state
    }

    /// The pending single-shot deadline, if any. The host arms a timer for
    /// it and calls [`handle_timeout`](Self::handle_timeout) when it fires.
    pub fn poll_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Configured delay windows.
    pub fn delays(&self) -> IntentDelays {
        self.delays
    }

    /// Raw pointer entered the anchor (or the overlay, when the composition
    /// layer forwards overlay hover).
    pub fn on_pointer_enter(&mut self, now: Instant) {
        if self.disposed || self.external.is_some() {
            return;
        }
        match self.state {
            IntentState::Closed => {
                // Fast re-hover: a return within the enter window of the
                // previous close uses the shorter skip delay.
                let recent = self
                    .last_close
                    .is_some_and(|t| now.duration_since(t) < self.delays.enter);
                let delay = if recent {
                    self.delays.skip
                } else {
                    self.delays.enter
                };
                self.state = IntentState::Opening;
                self.deadline = Some(now + delay);
                debug!(skip = recent, "hover intent opening");
            }
            // The pending open deadline keeps running; repeated enters while
            // opening or open carry no new information.
            IntentState::Opening | IntentState::Open => {}
            IntentState::Closing => {
                // The pointer came back before the close fired: cancel the
                // close and stay open. Listeners never saw a close, so this
                // transition is silent.
                self.deadline = None;
                self.state = IntentState::Open;
                debug!("hover intent close canceled by re-enter");
            }
        }
    }

    /// Raw pointer left the anchor (or the overlay).
    pub fn on_pointer_leave(&mut self, now: Instant) {
        if self.disposed || self.external.is_some() {
            return;
        }
        match self.state {
            IntentState::Closed | IntentState::Closing => {}
            IntentState::Opening => {
                // Leave before the enter delay elapsed: the open never
                // happened, so nobody is notified.
                self.deadline = None;
                self.state = IntentState::Closed;
                debug!("hover intent open canceled before deadline");
            }
            IntentState::Open => {
                self.state = IntentState::Closing;
                self.deadline = Some(now + self.delays.leave);
            }
        }
    }

    /// A previously polled deadline fired. Deadlines from canceled
    /// transitions are ignored, as are timeouts delivered early.
    pub fn handle_timeout(&mut self, now: Instant) {
        if self.disposed || self.external.is_some() {
            return;
        }
        let Some(deadline) = self.deadline else {
            return;
        };
        if now < deadline {
            return;
        }
        self.deadline = None;
        match self.state {
            IntentState::Opening => {
                self.state = IntentState::Open;
                self.notify(IntentState::Open);
            }
            IntentState::Closing => {
                self.state = IntentState::Closed;
                self.last_close = Some(now);
                self.notify(IntentState::Closed);
            }
            IntentState::Closed | IntentState::Open => {}
        }
    }

    /// Pin the state to an external `open` flag (controlled mode), or hand
    /// control back to the state machine with `None`.
    ///
    /// While pinned, pointer signals and timeouts are ignored; the check
    /// happens before any handler logic runs.
    pub fn set_external_open(&mut self, open: Option<bool>) {
        if self.disposed {
            return;
        }
        self.external = open;
        match open {
            Some(true) => {
                self.deadline = None;
                if self.state != IntentState::Open {
                    self.state = IntentState::Open;
                    self.notify(IntentState::Open);
                }
            }
            Some(false) => {
                self.deadline = None;
                let was_visible = self.state.is_visible();
                if self.state != IntentState::Closed {
                    self.state = IntentState::Closed;
                    if was_visible {
                        self.notify(IntentState::Closed);
                    }
                }
            }
            None => {}
        }
    }

    /// Register a listener for visible-state changes. Returns a handle for
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&mut self, listener: impl FnMut(IntentState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Tear down: clear the deadline, drop all listeners, and stop reacting
    /// to further signals. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.deadline = None;
        self.state = IntentState::Closed;
        self.listeners.clear();
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn notify(&mut self, state: IntentState) {
        for (id, listener) in &mut self.listeners {
            // A panicking listener must not corrupt controller state or
            // starve the remaining listeners.
            let result = catch_unwind(AssertUnwindSafe(|| listener(state)));
            if result.is_err() {
                warn!(subscriber = id.0, ?state, "intent listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn recording(
        controller: &mut HoverIntentController,
    ) -> (SubscriberId, Rc<RefCell<Vec<IntentState>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = controller.subscribe(move |s| sink.borrow_mut().push(s));
        (id, seen)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn enter_then_timeout_opens() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        assert_eq!(c.state(), IntentState::Opening);
        assert_eq!(c.poll_deadline(), Some(t0 + ms(300)));

        c.handle_timeout(t0 + ms(300));
        assert_eq!(c.state(), IntentState::Open);
        assert_eq!(*seen.borrow(), vec![IntentState::Open]);
        assert_eq!(c.poll_deadline(), None);
    }

    // Enter immediately followed by leave never opens and never
    // notifies.
    #[test]
    fn leave_before_enter_delay_is_silent() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.on_pointer_leave(t0 + ms(100));
        assert_eq!(c.state(), IntentState::Closed);
        assert_eq!(c.poll_deadline(), None);

        // The stale deadline must not fire.
        c.handle_timeout(t0 + ms(300));
        assert_eq!(c.state(), IntentState::Closed);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn leave_then_timeout_closes_and_notifies() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));
        c.on_pointer_leave(t0 + ms(400));
        assert_eq!(c.state(), IntentState::Closing);
        assert_eq!(c.poll_deadline(), Some(t0 + ms(500)));

        c.handle_timeout(t0 + ms(500));
        assert_eq!(c.state(), IntentState::Closed);
        assert_eq!(*seen.borrow(), vec![IntentState::Open, IntentState::Closed]);
    }

    // A re-enter within the enter window of the previous close arms the
    // strictly shorter skip delay.
    #[test]
    fn fast_rehover_uses_skip_delay() {
        let mut c = HoverIntentController::default();
        let t0 = Instant::now();

        // Full open/close cycle, closing at t0+500.
        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));
        c.on_pointer_leave(t0 + ms(400));
        c.handle_timeout(t0 + ms(500));
        assert_eq!(c.state(), IntentState::Closed);

        // Re-enter 20ms after the close: well within the 300ms window.
        c.on_pointer_enter(t0 + ms(520));
        assert_eq!(c.state(), IntentState::Opening);
        assert_eq!(c.poll_deadline(), Some(t0 + ms(520) + ms(75)));
    }

    #[test]
    fn slow_rehover_uses_full_enter_delay() {
        let mut c = HoverIntentController::default();
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));
        c.on_pointer_leave(t0 + ms(400));
        c.handle_timeout(t0 + ms(500));

        // Re-enter after the window has passed.
        c.on_pointer_enter(t0 + ms(900));
        assert_eq!(c.poll_deadline(), Some(t0 + ms(900) + ms(300)));
    }

    // Flicker prevention: a re-enter while closing cancels the close and
    // stays open without re-notifying.
    #[test]
    fn reenter_while_closing_stays_open() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));
        c.on_pointer_leave(t0 + ms(310));
        assert_eq!(c.state(), IntentState::Closing);

        c.on_pointer_enter(t0 + ms(340));
        assert_eq!(c.state(), IntentState::Open);
        assert_eq!(c.poll_deadline(), None);
        assert_eq!(*seen.borrow(), vec![IntentState::Open]);

        // The canceled close deadline must be inert.
        c.handle_timeout(t0 + ms(410));
        assert_eq!(c.state(), IntentState::Open);
        assert_eq!(*seen.borrow(), vec![IntentState::Open]);
    }

    #[test]
    fn early_timeout_is_ignored() {
        let mut c = HoverIntentController::default();
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(100));
        assert_eq!(c.state(), IntentState::Opening);
        assert_eq!(c.poll_deadline(), Some(t0 + ms(300)));
    }

    #[test]
    fn controlled_mode_pins_state() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.set_external_open(Some(true));
        assert_eq!(c.state(), IntentState::Open);
        assert_eq!(*seen.borrow(), vec![IntentState::Open]);

        // Pointer traffic is ignored while pinned.
        c.on_pointer_leave(t0);
        c.handle_timeout(t0 + ms(500));
        assert_eq!(c.state(), IntentState::Open);

        c.set_external_open(Some(false));
        assert_eq!(c.state(), IntentState::Closed);
        assert_eq!(*seen.borrow(), vec![IntentState::Open, IntentState::Closed]);

        // Handing control back resumes the machine.
        c.set_external_open(None);
        c.on_pointer_enter(t0 + ms(600));
        assert_eq!(c.state(), IntentState::Opening);
    }

    #[test]
    fn dispose_is_idempotent_and_final() {
        let mut c = HoverIntentController::default();
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.dispose();
        assert_eq!(c.state(), IntentState::Closed);
        assert_eq!(c.poll_deadline(), None);

        c.dispose();
        c.on_pointer_enter(t0 + ms(10));
        c.handle_timeout(t0 + ms(400));
        assert_eq!(c.state(), IntentState::Closed);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut c = HoverIntentController::default();
        let (id, seen) = recording(&mut c);
        let t0 = Instant::now();

        assert!(c.unsubscribe(id));
        assert!(!c.unsubscribe(id));

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn panicking_listener_does_not_corrupt_state() {
        let mut c = HoverIntentController::default();
        c.subscribe(|_| panic!("listener bug"));
        let (_, seen) = recording(&mut c);
        let t0 = Instant::now();

        c.on_pointer_enter(t0);
        c.handle_timeout(t0 + ms(300));

        // The second listener still ran and the machine is consistent.
        assert_eq!(c.state(), IntentState::Open);
        assert_eq!(*seen.borrow(), vec![IntentState::Open]);

        c.on_pointer_leave(t0 + ms(400));
        c.handle_timeout(t0 + ms(500));
        assert_eq!(c.state(), IntentState::Closed);
        assert_eq!(*seen.borrow(), vec![IntentState::Open, IntentState::Closed]);
    }
}
