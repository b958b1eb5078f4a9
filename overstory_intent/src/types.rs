// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for hover intent: states, delay windows, subscriber handles.

use std::time::Duration;

/// The debounced interpretation of raw pointer traffic for one
/// anchor/overlay pair.
///
/// Owned exclusively by
/// [`HoverIntentController`](crate::controller::HoverIntentController);
/// transitions are the only mutator. `Opening` and `Closing` are pending
/// states with a single armed deadline; listeners are notified only when the
/// visible state changes (into `Open`, or into `Closed` after having been
/// visible).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IntentState {
    /// No hover intent; nothing mounted, no listeners attached downstream.
    #[default]
    Closed,
    /// Pointer entered; the enter (or skip) delay is running.
    Opening,
    /// Intent confirmed; the overlay should be shown.
    Open,
    /// Pointer left while open; the leave delay is running.
    Closing,
}

impl IntentState {
    /// Whether intent is in flight toward, or at, the visible state.
    /// Only these states may ever produce a visible placement.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }

    /// Whether this state has been confirmed visible.
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Open | Self::Closing)
    }
}

/// The three debounce windows of the intent state machine.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntentDelays {
    /// Delay between pointer enter and `Open`.
    pub enter: Duration,
    /// Delay between pointer leave (while open) and `Closed`.
    pub leave: Duration,
    /// Shortened enter delay used when the pointer returns within `enter` of
    /// the previous close. Strictly less than `enter` for the fast path to
    /// be observable.
    pub skip: Duration,
}

impl Default for IntentDelays {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(300),
            leave: Duration::from_millis(100),
            skip: Duration::from_millis(75),
        }
    }
}

/// Handle for a registered intent listener; pass to
/// [`HoverIntentController::unsubscribe`](crate::controller::HoverIntentController::unsubscribe).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriberId(pub(crate) u64);
