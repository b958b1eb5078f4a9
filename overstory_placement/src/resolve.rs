// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement resolution: fallback ordering, positioning, cross-axis clamping.
//!
//! ## Overview
//!
//! [`resolve`] picks the best placement for an overlay from a fallback
//! ordering seeded by the preferred placement, computes the overlay's
//! viewport-relative origin, and clamps the cross-axis offset so the overlay
//! stays inside the viewport. The function is pure: same snapshot in, same
//! resolution out.
//!
//! ## Fallback ordering
//!
//! - Cardinal preferred: preferred → direct opposite → the cardinal with the
//!   maximum available space among the four.
//! - Corner preferred (with corners enabled): preferred →
//!   same-edge-opposite-corner → opposite-edge-same-corner →
//!   opposite-edge-opposite-corner → the cardinal chain above, seeded by the
//!   corner's attaching edge.
//!
//! A cardinal has space when its direction offers the overlay's primary
//! dimension plus the margin. A corner additionally requires its edge-aligned
//! cross-axis span to lie inside the viewport; that is what distinguishes
//! `TopLeft` from `TopRight` near a vertical viewport edge.
//!
//! ## Degraded state
//!
//! When no direction has enough space the max-space cardinal is chosen
//! anyway and a warning is logged; clamping minimizes but does not eliminate
//! the overflow.

use kurbo::Point;
use tracing::warn;

use crate::types::{GeometrySnapshot, Placement, ResolveOptions, Resolution};

fn push_unique(out: &mut Vec<Placement>, p: Placement) {
    if !out.contains(&p) {
        out.push(p);
    }
}

/// Resolve the best placement and origin for the overlay in `snapshot`.
///
/// The result is deterministic for a given snapshot and never outside the
/// list returned by [`fallback_candidates`]. No I/O, no timers.
pub fn resolve(
    snapshot: &GeometrySnapshot,
    preferred: Placement,
    options: &ResolveOptions,
) -> Resolution {
    let placement = choose(snapshot, preferred, options);
    let origin = clamp_cross_axis(snapshot, placement, position(snapshot, placement, options.margin));
    Resolution { placement, origin }
}

/// The ordered fallback-candidate list for a starting placement.
///
/// The list always ends with all four cardinals (preferred edge, its
/// opposite, then the remaining two ordered by available space, descending),
/// so a resolution always has somewhere to land. Corner candidates appear
/// first when `allow_corners` holds and `preferred` is a corner.
pub fn fallback_candidates(
    snapshot: &GeometrySnapshot,
    preferred: Placement,
    allow_corners: bool,
) -> Vec<Placement> {
    let mut out = Vec::with_capacity(8);
    if allow_corners && preferred.is_corner() {
        for c in corner_chain(preferred) {
            push_unique(&mut out, c);
        }
    }
    let seed = preferred.cardinal();
    push_unique(&mut out, seed);
    push_unique(&mut out, seed.opposite());
    let mut rest: Vec<Placement> = Placement::CARDINALS
        .into_iter()
        .filter(|c| *c != seed && *c != seed.opposite())
        .collect();
    rest.sort_by(|a, b| {
        snapshot
            .space(*b)
            .partial_cmp(&snapshot.space(*a))
            .unwrap_or(core::cmp::Ordering::Equal)
    });
    for c in rest {
        push_unique(&mut out, c);
    }
    out
}

/// Corner fallback order: same-edge-opposite-corner, opposite-edge-same-corner,
/// opposite-edge-opposite-corner.
fn corner_chain(preferred: Placement) -> [Placement; 4] {
    [
        preferred,
        preferred.mirrored_along_edge(),
        preferred.opposite(),
        preferred.opposite().mirrored_along_edge(),
    ]
}

fn choose(snapshot: &GeometrySnapshot, preferred: Placement, options: &ResolveOptions) -> Placement {
    if options.allow_corners && preferred.is_corner() {
        for c in corner_chain(preferred) {
            if corner_fits(snapshot, c, options.margin) {
                return c;
            }
        }
    }

    let seed = preferred.cardinal();
    if cardinal_fits(snapshot, seed, options.margin) {
        return seed;
    }
    if cardinal_fits(snapshot, seed.opposite(), options.margin) {
        return seed.opposite();
    }

    let max = max_space_cardinal(snapshot);
    if !cardinal_fits(snapshot, max, options.margin) {
        warn!(
            ?preferred,
            chosen = ?max,
            "no direction offers enough space for the overlay; best-effort placement"
        );
    }
    max
}

/// Whether a cardinal direction offers the overlay's primary dimension plus
/// the margin.
fn cardinal_fits(snapshot: &GeometrySnapshot, placement: Placement, margin: f64) -> bool {
    let need = if placement.is_vertical() {
        snapshot.overlay.height()
    } else {
        snapshot.overlay.width()
    };
    snapshot.space(placement) >= need + margin
}

/// Corner viability: the attaching edge must fit like a cardinal, and the
/// edge-aligned cross-axis span must lie inside the viewport.
fn corner_fits(snapshot: &GeometrySnapshot, corner: Placement, margin: f64) -> bool {
    if !cardinal_fits(snapshot, corner.cardinal(), margin) {
        return false;
    }
    let width = snapshot.overlay.width();
    match corner {
        Placement::TopLeft | Placement::BottomLeft => {
            snapshot.anchor.x0 >= 0.0 && snapshot.anchor.x0 + width <= snapshot.viewport.width
        }
        Placement::TopRight | Placement::BottomRight => {
            snapshot.anchor.x1 <= snapshot.viewport.width && snapshot.anchor.x1 - width >= 0.0
        }
        _ => false,
    }
}

fn max_space_cardinal(snapshot: &GeometrySnapshot) -> Placement {
    let mut best = Placement::Top;
    for c in Placement::CARDINALS {
        if snapshot.space(c) > snapshot.space(best) {
            best = c;
        }
    }
    best
}

/// Overlay origin for a placement, before clamping.
///
/// Cardinals center along the anchor's cross-axis; corners align the
/// overlay's matching vertical edge with the anchor's. The margin offsets
/// along the primary axis, away from the anchor.
fn position(snapshot: &GeometrySnapshot, placement: Placement, margin: f64) -> Point {
    let anchor = snapshot.anchor;
    let width = snapshot.overlay.width();
    let height = snapshot.overlay.height();
    let above = anchor.y0 - margin - height;
    let below = anchor.y1 + margin;
    match placement {
        Placement::Top => Point::new(anchor.center().x - width / 2.0, above),
        Placement::Bottom => Point::new(anchor.center().x - width / 2.0, below),
        Placement::Left => Point::new(
            anchor.x0 - margin - width,
            anchor.center().y - height / 2.0,
        ),
        Placement::Right => Point::new(anchor.x1 + margin, anchor.center().y - height / 2.0),
        Placement::TopLeft => Point::new(anchor.x0, above),
        Placement::TopRight => Point::new(anchor.x1 - width, above),
        Placement::BottomLeft => Point::new(anchor.x0, below),
        Placement::BottomRight => Point::new(anchor.x1 - width, below),
    }
}

/// Clamp the cross-axis offset so the overlay's box stays inside the
/// viewport. The primary axis is never adjusted: placement integrity is
/// preserved even if the overlay must shift off-center.
fn clamp_cross_axis(snapshot: &GeometrySnapshot, placement: Placement, origin: Point) -> Point {
    let width = snapshot.overlay.width();
    let height = snapshot.overlay.height();
    if placement.is_vertical() {
        let max_x = (snapshot.viewport.width - width).max(0.0);
        Point::new(origin.x.clamp(0.0, max_x), origin.y)
    } else {
        let max_y = (snapshot.viewport.height - height).max(0.0);
        Point::new(origin.x, origin.y.clamp(0.0, max_y))
    }
}
