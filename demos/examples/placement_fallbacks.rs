// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement resolution and fallback ordering.
//!
//! This example resolves a few snapshots where the preferred placement does
//! and does not fit, including a corner placement near a viewport edge.
//!
//! Run:
//! - `cargo run -p overstory_demos --example placement_fallbacks`

use kurbo::{Rect, Size};
use overstory_placement::{
    GeometrySnapshot, Placement, ResolveOptions, fallback_candidates, resolve,
};

fn snapshot(anchor: Rect, overlay: Size) -> GeometrySnapshot {
    GeometrySnapshot {
        anchor,
        overlay: Rect::from_origin_size((0.0, 0.0), overlay),
        viewport: Size::new(800.0, 600.0),
        scroll_container: None,
    }
}

fn main() {
    // Anchor near the top edge: `top` lacks space, the resolver flips to
    // `bottom` and clamps the centered x offset to the viewport.
    let cramped = snapshot(Rect::new(10.0, 10.0, 60.0, 30.0), Size::new(100.0, 40.0));
    let r = resolve(&cramped, Placement::Top, &ResolveOptions::default());
    println!("== Preferred top, no space above ==");
    println!("  candidates: {:?}", fallback_candidates(&cramped, Placement::Top, false));
    println!("  resolved:   {:?} at {:?}", r.placement, r.origin);
    assert_eq!(r.placement, Placement::Bottom);

    // Anchor near the right edge: `right` lacks space, the opposite side
    // has plenty.
    let right_edge = snapshot(Rect::new(700.0, 280.0, 780.0, 320.0), Size::new(150.0, 60.0));
    let r = resolve(&right_edge, Placement::Right, &ResolveOptions::default());
    println!("== Preferred right at the right edge ==");
    println!("  resolved:   {:?} at {:?}", r.placement, r.origin);
    assert_eq!(r.placement, Placement::Left);

    // Corner placement near the right edge: the left-aligned corner
    // overflows, so the corner sharing the same edge is tried first.
    let corner = snapshot(Rect::new(700.0, 100.0, 750.0, 120.0), Size::new(120.0, 40.0));
    let options = ResolveOptions {
        allow_corners: true,
        ..Default::default()
    };
    let r = resolve(&corner, Placement::TopLeft, &options);
    println!("== Preferred top-left near the right edge ==");
    println!(
        "  candidates: {:?}",
        fallback_candidates(&corner, Placement::TopLeft, true)
    );
    println!("  resolved:   {:?} at {:?}", r.placement, r.origin);
    assert_eq!(r.placement, Placement::TopRight);
}
