// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shift-engine: log streaming, plan execution, and confirmation driving

mod confirm;
mod plan;
mod stream;

pub use confirm::{hold_to_confirm, HoldOutcome};
pub use plan::{JobOrchestrator, PlanError, PlanReport, StepTimeouts};
pub use stream::{JobAttach, LogStreamClient, StreamConfig, StreamUpdate, StreamView};
