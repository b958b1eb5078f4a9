// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_engine --heading-base-level=0

//! Overstory Engine: the overlay engine composing placement, intent, and watching.
//!
//! ## Overview
//!
//! This crate orchestrates one anchor/overlay pair: raw pointer traffic runs
//! through the debounced hover-intent machine (`overstory_intent`); once
//! intent is confirmed, geometry is captured and resolved
//! (`overstory_placement`); and a scroll/resize watcher keeps the result
//! fresh while the overlay is up. The engine emits a [`PlacementResult`]
//! stream; the renderer is solely responsible for turning it into pixels,
//! opacity, and attributes.
//!
//! ## Host integration
//!
//! The engine is platform-agnostic: it reads geometry and performs
//! subscription side effects through three traits over an opaque element
//! handle ([`GeometrySource`], [`ScrollAncestry`], [`SubscriptionHost`]),
//! and it never reads a clock: events carry explicit timestamps, and
//! [`OverlayEngine::poll`] reports the deadline and render-frame callback
//! the host should arm. The [`synthetic`] module provides an in-memory host
//! for tests and demos.
//!
//! ## Two-phase resolve
//!
//! A placement cannot be computed before the overlay's natural size is
//! known, and the size cannot be measured before the overlay is mounted. The
//! engine makes this explicit: when opening begins it emits a result with
//! `visible == false` (mount invisibly) and sets
//! [`Schedule::needs_frame`]; the host delivers one
//! [`EngineEvent::Frame`] on the next paint, the overlay is measured, and
//! only then is a placement resolved and revealed.
//!
//! ## Minimal example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use kurbo::{Rect, Size};
//! use overstory_engine::synthetic::SyntheticHost;
//! use overstory_engine::{EngineConfig, EngineEvent, OverlayEngine, Placement, PointerTarget};
//!
//! // An in-memory host: anchor (id 1) and the overlay's natural size (id 2).
//! let host = SyntheticHost::new(Size::new(800.0, 600.0));
//! host.place(1, Rect::new(100.0, 100.0, 160.0, 130.0));
//! host.place(2, Rect::new(0.0, 0.0, 120.0, 40.0));
//!
//! let mut engine = OverlayEngine::new(host.clone(), EngineConfig::default());
//! engine.attach_anchor(1).unwrap();
//! engine.attach_overlay(2).unwrap();
//!
//! // Pointer enters; the engine asks for a measurement frame and a timer.
//! let t0 = Instant::now();
//! engine.handle_event(EngineEvent::PointerEnter(PointerTarget::Anchor), t0);
//! let schedule = engine.poll();
//! assert!(schedule.needs_frame);
//!
//! // The frame measures the overlay; the enter delay confirms the intent.
//! engine.handle_event(EngineEvent::Frame, t0 + Duration::from_millis(16));
//! engine.handle_event(EngineEvent::Timeout, schedule.deadline.unwrap());
//!
//! let shown = engine.last_result().unwrap();
//! assert!(shown.visible);
//! assert_eq!(shown.placement, Placement::Top);
//! ```
//!
//! ## Resource discipline
//!
//! No subscriptions exist while intent is `Closed`. The watcher attaches
//! when opening begins and detaches, releasing every subscription exactly
//! once, the moment intent returns to `Closed` or the engine is disposed.

pub mod engine;
pub mod synthetic;
pub mod types;
pub mod watcher;

pub use engine::OverlayEngine;
pub use types::{
    EngineConfig, EngineError, EngineEvent, GeometrySource, Invalidation, ListenerId,
    NoScrollAncestors, PlacementResult, PointerTarget, Schedule, ScrollAncestry, SubscriptionHost,
    WatchFlags, WatchTarget,
};
pub use watcher::ScrollResizeWatcher;

pub use overstory_intent::{IntentDelays, IntentState};
pub use overstory_placement::{GeometrySnapshot, Placement};
