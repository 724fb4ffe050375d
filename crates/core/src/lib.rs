// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shift-core: data model and state machines for the autoshift client

pub mod macros;

pub mod clock;
pub mod cluster;
pub mod cursor;
pub mod gate;
pub mod id;
pub mod job;
pub mod log;
pub mod step;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use cluster::{ClusterSpec, SpecError, SubnetPair, VmSize};
pub use cursor::Cursor;
pub use gate::{ConfirmGate, GateObserver, GateState, GateTransition, GestureSnapshot};
pub use job::{Job, JobId, JobKind, JobOutcome, JobStatus};
pub use log::{LogLine, TerminalSignal, DONE_TOKEN, ERROR_TOKEN};
pub use step::{LatencyClass, StepName, StepOutcome, StepRecord};
