// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover-intent transitions with synthetic timestamps.
//!
//! This example walks one controller through a full open/close cycle and a
//! fast re-hover, printing each transition. The controller never reads a
//! clock, so the walk is fully deterministic.
//!
//! Run:
//! - `cargo run -p overstory_demos --example intent_hover`

use std::time::{Duration, Instant};

use overstory_intent::{HoverIntentController, IntentState};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn main() {
    let mut intent = HoverIntentController::default();
    intent.subscribe(|state| println!("  -> notified: {state:?}"));
    let t0 = Instant::now();

    println!("== Enter, wait out the 300ms delay ==");
    intent.on_pointer_enter(t0);
    println!("  state: {:?}, deadline in {:?}", intent.state(), ms(300));
    intent.handle_timeout(intent.poll_deadline().expect("armed"));
    assert_eq!(intent.state(), IntentState::Open);

    println!("== Leave, let the 100ms close window elapse ==");
    intent.on_pointer_leave(t0 + ms(400));
    println!("  state: {:?}", intent.state());
    intent.handle_timeout(t0 + ms(500));
    assert_eq!(intent.state(), IntentState::Closed);

    println!("== Re-enter 20ms after the close: skip delay applies ==");
    intent.on_pointer_enter(t0 + ms(520));
    let deadline = intent.poll_deadline().expect("armed");
    println!("  state: {:?}, reopen delay {:?}", intent.state(), ms(75));
    assert_eq!(deadline, t0 + ms(520) + ms(75));
    intent.handle_timeout(deadline);
    assert_eq!(intent.state(), IntentState::Open);

    println!("== Brief leave and return: the close is canceled ==");
    intent.on_pointer_leave(t0 + ms(700));
    assert_eq!(intent.state(), IntentState::Closing);
    intent.on_pointer_enter(t0 + ms(730));
    println!("  state: {:?}", intent.state());
    assert_eq!(intent.state(), IntentState::Open);
}
