// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=overstory_placement --heading-base-level=0

//! Overstory Placement: viewport-aware overlay placement over geometry snapshots.
//!
//! ## Overview
//!
//! This crate picks where a floating overlay (tooltip, popover) should render
//! relative to its anchor so that it stays inside the viewport.
//! It is pure geometry: feed it a [`GeometrySnapshot`] (anchor, overlay,
//! viewport, and optional scroll-container rectangles, all Kurbo-native) and a
//! preferred [`Placement`], and it returns the chosen placement and the
//! overlay's viewport-relative origin. It performs no I/O and owns no timers;
//! a higher layer (see `overstory_engine`) captures snapshots and decides when
//! to re-resolve.
//!
//! ## Fallback ordering
//!
//! A placement that lacks space falls back along a deterministic candidate
//! list: preferred → direct opposite → the max-space cardinal. Corner
//! placements (opt-in) first try the corners sharing an edge with the
//! preferred one. The list is exposed as
//! [`fallback_candidates`](resolve::fallback_candidates), and a resolution
//! never selects a placement outside it.
//!
//! ## Clamping
//!
//! Once a placement is chosen, only the cross-axis offset is clamped to keep
//! the overlay inside the viewport; the placement itself never changes during
//! clamping. When nothing fits, the max-space direction is used anyway and a
//! soft warning is logged: a degraded state, not an error.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use overstory_placement::{GeometrySnapshot, Placement, ResolveOptions, resolve};
//!
//! // A small anchor near the top-left corner and an overlay that cannot fit
//! // above it.
//! let snapshot = GeometrySnapshot {
//!     anchor: Rect::new(10.0, 10.0, 60.0, 30.0),
//!     overlay: Rect::new(0.0, 0.0, 100.0, 40.0),
//!     viewport: Size::new(800.0, 600.0),
//!     scroll_container: None,
//! };
//!
//! let r = resolve(&snapshot, Placement::Top, &ResolveOptions::default());
//!
//! // 10px above the anchor is less than the overlay's 40px height, so the
//! // resolver flips to the opposite side; the centered x offset (-15) is
//! // clamped to the viewport edge.
//! assert_eq!(r.placement, Placement::Bottom);
//! assert_eq!(r.origin, Point::new(0.0, 38.0));
//! ```
//!
//! ## Corner placements
//!
//! ```
//! use kurbo::{Rect, Size};
//! use overstory_placement::{GeometrySnapshot, Placement, ResolveOptions, resolve};
//!
//! // Anchor near the right viewport edge: a left-aligned corner overflows,
//! // so the corner sharing the same edge is tried before any cardinal.
//! let snapshot = GeometrySnapshot {
//!     anchor: Rect::new(700.0, 100.0, 750.0, 120.0),
//!     overlay: Rect::new(0.0, 0.0, 120.0, 40.0),
//!     viewport: Size::new(800.0, 600.0),
//!     scroll_container: None,
//! };
//! let options = ResolveOptions { allow_corners: true, ..Default::default() };
//!
//! let r = resolve(&snapshot, Placement::TopLeft, &options);
//! assert_eq!(r.placement, Placement::TopRight);
//! ```

pub mod resolve;
pub mod types;

pub use resolve::{fallback_candidates, resolve};
pub use types::{DEFAULT_MARGIN, GeometrySnapshot, Placement, ResolveOptions, Resolution};
