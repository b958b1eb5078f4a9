// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full engine loop against the synthetic host.
//!
//! An anchor inside a scrollable container is hovered, the overlay opens via
//! the two-phase resolve, a scroll pushes the anchor out of view (the result
//! stream suppresses visibility), and the engine is torn down. Set
//! `RUST_LOG=debug` to watch the engine's internal transitions.
//!
//! Run:
//! - `cargo run -p overstory_demos --example engine_synthetic`

use std::time::{Duration, Instant};

use kurbo::{Rect, Size};
use overstory_engine::synthetic::SyntheticHost;
use overstory_engine::{
    EngineConfig, EngineEvent, Invalidation, OverlayEngine, Placement, PointerTarget,
};

const ANCHOR: u32 = 1;
const OVERLAY: u32 = 2;
const CONTAINER: u32 = 10;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = SyntheticHost::new(Size::new(800.0, 600.0));
    host.place(CONTAINER, Rect::new(0.0, 0.0, 300.0, 200.0));
    host.set_scroll_container(CONTAINER, true);
    host.place(ANCHOR, Rect::new(100.0, 100.0, 160.0, 130.0));
    host.set_parent(ANCHOR, CONTAINER);
    host.place(OVERLAY, Rect::new(0.0, 0.0, 120.0, 40.0));

    let mut engine = OverlayEngine::new(host.clone(), EngineConfig::default());
    engine.attach_anchor(ANCHOR).expect("anchor first");
    engine.attach_overlay(OVERLAY).expect("anchor already attached");
    engine.subscribe(|r| {
        println!(
            "  result: {:?} at ({:.0}, {:.0}) visible={}",
            r.placement, r.origin.x, r.origin.y, r.visible
        );
    });

    println!("== Hover: mount invisibly, measure, reveal ==");
    let t0 = Instant::now();
    engine.handle_event(EngineEvent::PointerEnter(PointerTarget::Anchor), t0);
    let schedule = engine.poll();
    println!("  watches: {:?}", host.active_watches());
    engine.handle_event(EngineEvent::Frame, t0 + ms(16));
    engine.handle_event(EngineEvent::Timeout, schedule.deadline.expect("enter delay"));
    let shown = engine.last_result().copied().expect("revealed");
    assert!(shown.visible);
    assert_eq!(shown.placement, Placement::Top);

    println!("== Scroll the anchor out of the container ==");
    host.place(ANCHOR, Rect::new(100.0, 250.0, 160.0, 280.0));
    engine.handle_event(
        EngineEvent::Invalidated(Invalidation::ContainerScrolled),
        t0 + ms(400),
    );
    assert!(!engine.last_result().unwrap().visible);

    println!("== Dispose: every subscription is released ==");
    engine.dispose();
    assert!(host.active_watches().is_empty());
    assert_eq!(host.subscribe_count(), host.unsubscribe_count());
    println!("  done");
}
