// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Instant;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use overstory_engine::synthetic::SyntheticHost;
use overstory_engine::{
    EngineConfig, EngineEvent, Invalidation, OverlayEngine, PointerTarget,
};

const ANCHOR: u32 = 1;
const OVERLAY: u32 = 2;
const CONTAINER: u32 = 10;

fn opened_engine() -> (OverlayEngine<u32, SyntheticHost<u32>>, SyntheticHost<u32>, Instant) {
    let host = SyntheticHost::new(Size::new(1920.0, 1080.0));
    host.place(CONTAINER, Rect::new(0.0, 0.0, 800.0, 600.0));
    host.set_scroll_container(CONTAINER, true);
    host.place(ANCHOR, Rect::new(100.0, 100.0, 180.0, 124.0));
    host.set_parent(ANCHOR, CONTAINER);
    host.place(OVERLAY, Rect::new(0.0, 0.0, 240.0, 120.0));

    let mut engine = OverlayEngine::new(host.clone(), EngineConfig::default());
    engine.attach_anchor(ANCHOR).unwrap();
    engine.attach_overlay(OVERLAY).unwrap();

    let t0 = Instant::now();
    engine.handle_event(EngineEvent::PointerEnter(PointerTarget::Anchor), t0);
    engine.handle_event(EngineEvent::Frame, t0);
    let deadline = engine.poll().deadline.unwrap();
    engine.handle_event(EngineEvent::Timeout, deadline);
    (engine, host, deadline)
}

fn bench_invalidation(c: &mut Criterion) {
    let (mut engine, host, now) = opened_engine();
    let mut scrolled = false;

    c.bench_function("engine_scroll_invalidation", |b| {
        b.iter(|| {
            // Alternate the anchor between two positions so every
            // invalidation recomputes against changed geometry.
            let rect = if scrolled {
                Rect::new(100.0, 100.0, 180.0, 124.0)
            } else {
                Rect::new(100.0, 160.0, 180.0, 184.0)
            };
            scrolled = !scrolled;
            host.place(ANCHOR, rect);
            engine.handle_event(
                EngineEvent::Invalidated(Invalidation::ContainerScrolled),
                now,
            );
            black_box(engine.last_result());
        });
    });
}

criterion_group!(benches, bench_invalidation);
criterion_main!(benches);
