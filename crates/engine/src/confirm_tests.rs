// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex;
use shift_core::{GateState, GestureSnapshot};
use std::sync::Arc;

const THRESHOLD: Duration = Duration::from_millis(1500);
const TICK: Duration = Duration::from_millis(100);

#[tokio::test(start_paused = true)]
async fn sustained_hold_runs_action_once() {
    let mut gate = ConfirmGate::new(THRESHOLD);
    let mut runs = 0;

    let outcome = hold_to_confirm(&mut gate, TICK, std::future::pending(), || {
        runs += 1;
        async { "destroyed" }
    })
    .await;

    assert_eq!(outcome, HoldOutcome::Confirmed("destroyed"));
    assert_eq!(runs, 1);
    assert_eq!(gate.state(), GateState::Idle);
}

#[tokio::test(start_paused = true)]
async fn early_release_cancels_silently() {
    let mut gate = ConfirmGate::new(THRESHOLD);
    let mut runs = 0;

    let outcome = hold_to_confirm(
        &mut gate,
        TICK,
        tokio::time::sleep(Duration::from_millis(700)),
        || {
            runs += 1;
            async {}
        },
    )
    .await;

    assert_eq!(outcome, HoldOutcome::Cancelled);
    assert_eq!(runs, 0);
    assert_eq!(gate.state(), GateState::Idle);
    assert_eq!(gate.snapshot().progress(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn observer_sees_progress_up_to_fire() {
    let seen: Arc<Mutex<Vec<GestureSnapshot>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let mut gate =
        ConfirmGate::new(THRESHOLD).with_observer(move |s: &GestureSnapshot| sink.lock().push(*s));

    let outcome = hold_to_confirm(&mut gate, TICK, std::future::pending(), || async {}).await;
    assert!(outcome.is_confirmed());

    let seen = seen.lock();
    let fired: Vec<_> = seen.iter().filter(|s| s.state == GateState::Fired).collect();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].elapsed_ms, 1500);

    let holding: Vec<u64> =
        seen.iter().filter(|s| s.state == GateState::Holding).map(|s| s.elapsed_ms).collect();
    assert!(holding.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().map(|s| s.state), Some(GateState::Idle));
}

#[tokio::test(start_paused = true)]
async fn release_during_action_is_ignored() {
    let mut gate = ConfirmGate::new(Duration::from_millis(200));

    let outcome = hold_to_confirm(
        &mut gate,
        TICK,
        tokio::time::sleep(Duration::from_millis(250)),
        || tokio::time::sleep(Duration::from_secs(5)),
    )
    .await;

    assert!(outcome.is_confirmed());
}

#[tokio::test(start_paused = true)]
async fn busy_gate_does_not_run_action() {
    let mut gate = ConfirmGate::new(THRESHOLD);
    gate.press();
    let mut runs = 0;

    let outcome = hold_to_confirm(&mut gate, TICK, std::future::pending(), || {
        runs += 1;
        async {}
    })
    .await;

    assert_eq!(outcome, HoldOutcome::Cancelled);
    assert_eq!(runs, 0);
    assert_eq!(gate.state(), GateState::Holding);
}
