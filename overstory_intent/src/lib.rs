// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_intent --heading-base-level=0

//! Overstory Intent: a debounced hover-intent state machine.
//!
//! ## Overview
//!
//! Raw pointer enter/leave events are too noisy to drive overlay visibility
//! directly: a pointer skimming across an anchor would flash the overlay, and
//! a brief exit (for example crossing onto the overlay itself) would flicker
//! it. This crate interprets that traffic through a four-state machine
//! (`Closed → Opening → Open → Closing`) with three debounce windows: an
//! enter delay, a leave delay, and a shortened skip delay for rapid re-hover.
//!
//! ## Explicit time
//!
//! The controller never reads a clock. Every operation takes `now:
//! std::time::Instant`, and pending work is exposed as a single-shot deadline
//! via [`HoverIntentController::poll_deadline`]; the host arms a timer and
//! reports expiry with [`HoverIntentController::handle_timeout`]. Tests (and
//! the engine's tick loop) therefore drive the machine with synthetic
//! timestamps and get fully deterministic transitions.
//!
//! ## Minimal example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use overstory_intent::{HoverIntentController, IntentState};
//!
//! let mut intent = HoverIntentController::default();
//! let t0 = Instant::now();
//!
//! // Pointer enters: the 300ms enter delay is armed.
//! intent.on_pointer_enter(t0);
//! assert_eq!(intent.state(), IntentState::Opening);
//! let deadline = intent.poll_deadline().unwrap();
//! assert_eq!(deadline, t0 + Duration::from_millis(300));
//!
//! // The deadline fires: the intent is confirmed.
//! intent.handle_timeout(deadline);
//! assert_eq!(intent.state(), IntentState::Open);
//!
//! // A leave while open starts the close window instead of closing
//! // immediately; a quick return cancels it without a flicker.
//! intent.on_pointer_leave(deadline + Duration::from_millis(10));
//! assert_eq!(intent.state(), IntentState::Closing);
//! intent.on_pointer_enter(deadline + Duration::from_millis(40));
//! assert_eq!(intent.state(), IntentState::Open);
//! ```
//!
//! Listener registration, controlled mode, and disposal are covered on
//! [`HoverIntentController`].

pub mod controller;
pub mod types;

pub use controller::HoverIntentController;
pub use types::{IntentDelays, IntentState, SubscriberId};
