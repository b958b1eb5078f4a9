// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use overstory_placement::{GeometrySnapshot, Placement, ResolveOptions, resolve};

fn gen_snapshots(n: usize) -> Vec<GeometrySnapshot> {
    let viewport = Size::new(1920.0, 1080.0);
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * viewport.width / n as f64;
            let y0 = y as f64 * viewport.height / n as f64;
            out.push(GeometrySnapshot {
                anchor: Rect::new(x0, y0, x0 + 80.0, y0 + 24.0),
                overlay: Rect::new(0.0, 0.0, 240.0, 120.0),
                viewport,
                scroll_container: None,
            });
        }
    }
    out
}

fn bench_resolve(c: &mut Criterion) {
    let snapshots = gen_snapshots(32);

    c.bench_function("resolve_cardinal_sweep", |b| {
        b.iter(|| {
            for s in &snapshots {
                black_box(resolve(s, Placement::Top, &ResolveOptions::default()));
            }
        });
    });

    let corner_options = ResolveOptions {
        allow_corners: true,
        ..Default::default()
    };
    c.bench_function("resolve_corner_sweep", |b| {
        b.iter(|| {
            for s in &snapshots {
                black_box(resolve(s, Placement::TopLeft, &corner_options));
            }
        });
    });

    // Degraded path: an overlay too large for any direction.
    let degraded = GeometrySnapshot {
        anchor: Rect::new(900.0, 500.0, 980.0, 530.0),
        overlay: Rect::new(0.0, 0.0, 2200.0, 1300.0),
        viewport: Size::new(1920.0, 1080.0),
        scroll_container: None,
    };
    c.bench_function("resolve_degraded", |b| {
        b.iter(|| black_box(resolve(&degraded, Placement::Top, &ResolveOptions::default())));
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
