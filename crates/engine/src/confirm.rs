// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a [`ConfirmGate`] from a periodic tick source.

use shift_core::{ConfirmGate, GateTransition};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// How a hold-to-confirm gesture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldOutcome<T> {
    /// Held past the threshold; the action ran once and returned `T`.
    Confirmed(T),
    /// Released before the threshold; nothing ran.
    Cancelled,
}

impl<T> HoldOutcome<T> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, HoldOutcome::Confirmed(_))
    }
}

/// Press the gate and tick it every `tick_period` until it fires or
/// `release` resolves.
///
/// On fire, `action` runs to completion exactly once and the gate settles
/// back to idle. Releasing once the gate has fired has no effect.
pub async fn hold_to_confirm<R, A, F, T>(
    gate: &mut ConfirmGate,
    tick_period: Duration,
    release: R,
    action: A,
) -> HoldOutcome<T>
where
    R: Future<Output = ()>,
    A: FnOnce() -> F,
    F: Future<Output = T>,
{
    if gate.press() != GateTransition::Pressed {
        tracing::debug!(state = %gate.state(), "gate busy, press ignored");
        return HoldOutcome::Cancelled;
    }

    let mut ticks = tokio::time::interval(tick_period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(release);

    loop {
        tokio::select! {
            biased;
            _ = &mut release => {
                gate.release();
                tracing::debug!("hold released before threshold");
                return HoldOutcome::Cancelled;
            }
            at = ticks.tick() => {
                if gate.tick(at.into_std()) == GateTransition::Fired {
                    break;
                }
            }
        }
    }

    tracing::info!(threshold_ms = gate.threshold().as_millis() as u64, "hold confirmed");
    let value = action().await;
    gate.settle();
    HoldOutcome::Confirmed(value)
}

#[cfg(test)]
#[path = "confirm_tests.rs"]
mod tests;
