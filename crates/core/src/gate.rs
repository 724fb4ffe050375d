// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hold-to-confirm state machine.
//!
//! ```text
//! idle --press--> holding --elapsed >= threshold--> fired --settle--> idle
//!                 holding --release (elapsed < threshold)--> idle
//! ```
//!
//! Time enters only through [`ConfirmGate::tick`]. Elapsed time is measured
//! from the first tick after a press, so a delayed first tick does not eat
//! into the hold. A one-shot latch guarantees `Fired` is returned at most
//! once per press, however many ticks arrive before the action settles.

use std::time::{Duration, Instant};

/// Phase of the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Holding,
    Fired,
}

crate::simple_display! {
    GateState {
        Idle => "idle",
        Holding => "holding",
        Fired => "fired",
    }
}

/// What a single input did to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// Input had no effect in the current state.
    Ignored,
    Pressed,
    /// Still holding; elapsed time updated.
    Progress,
    /// Threshold reached. The bound action must run now, exactly once.
    Fired,
    /// Released before the threshold; progress reset.
    Cancelled,
    /// Action finished; gate is idle again.
    Settled,
}

/// Observable state handed to the observer after every effective transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSnapshot {
    pub state: GateState,
    pub elapsed_ms: u64,
    pub threshold_ms: u64,
}

impl GestureSnapshot {
    /// Hold progress in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.threshold_ms == 0 {
            return if self.state == GateState::Idle { 0.0 } else { 1.0 };
        }
        (self.elapsed_ms as f64 / self.threshold_ms as f64).min(1.0)
    }
}

/// Receives gesture snapshots (for progress rendering).
pub trait GateObserver: Send {
    fn on_transition(&mut self, snapshot: &GestureSnapshot);
}

impl<F> GateObserver for F
where
    F: FnMut(&GestureSnapshot) + Send,
{
    fn on_transition(&mut self, snapshot: &GestureSnapshot) {
        self(snapshot)
    }
}

/// A hold-to-confirm gate owned by one interactive control.
pub struct ConfirmGate {
    threshold: Duration,
    state: GateState,
    hold_started: Option<Instant>,
    elapsed: Duration,
    latched: bool,
    observer: Option<Box<dyn GateObserver>>,
}

impl ConfirmGate {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: GateState::Idle,
            hold_started: None,
            elapsed: Duration::ZERO,
            latched: false,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl GateObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            state: self.state,
            elapsed_ms: self.elapsed.as_millis() as u64,
            threshold_ms: self.threshold.as_millis() as u64,
        }
    }

    /// Begin a hold. Only effective from `Idle`.
    pub fn press(&mut self) -> GateTransition {
        if self.state != GateState::Idle {
            return GateTransition::Ignored;
        }
        self.state = GateState::Holding;
        self.hold_started = None;
        self.elapsed = Duration::ZERO;
        self.latched = false;
        self.emit(GateTransition::Pressed)
    }

    /// Feed a timing signal observed at `at`.
    pub fn tick(&mut self, at: Instant) -> GateTransition {
        if self.state != GateState::Holding {
            return GateTransition::Ignored;
        }
        let started = *self.hold_started.get_or_insert(at);
        self.elapsed = at.saturating_duration_since(started);

        if self.elapsed >= self.threshold && !self.latched {
            self.latched = true;
            self.state = GateState::Fired;
            return self.emit(GateTransition::Fired);
        }
        self.emit(GateTransition::Progress)
    }

    /// End the hold. Before the threshold this is a silent cancel.
    ///
    /// Releasing after the gate fired has no effect: the action is already
    /// running and only [`ConfirmGate::settle`] returns the gate to idle.
    pub fn release(&mut self) -> GateTransition {
        if self.state != GateState::Holding {
            return GateTransition::Ignored;
        }
        self.reset();
        self.emit(GateTransition::Cancelled)
    }

    /// Mark the fired action as finished.
    pub fn settle(&mut self) -> GateTransition {
        if self.state != GateState::Fired {
            return GateTransition::Ignored;
        }
        self.reset();
        self.emit(GateTransition::Settled)
    }

    fn reset(&mut self) {
        self.state = GateState::Idle;
        self.hold_started = None;
        self.elapsed = Duration::ZERO;
    }

    fn emit(&mut self, transition: GateTransition) -> GateTransition {
        let snapshot = self.snapshot();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_transition(&snapshot);
        }
        transition
    }
}

impl std::fmt::Debug for ConfirmGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmGate")
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .field("latched", &self.latched)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
