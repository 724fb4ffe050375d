// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the provisioning service
//!
//! The workflow calls and the log endpoints sit behind two traits so the
//! engine can run against the real HTTP service or against in-memory fakes:
//! - [`ProvisioningApi`] — exemption, subnets, config push, job start/destroy
//! - [`LogSource`] — log snapshots and subscribe-from-cursor streams

mod api;
mod envelope;
mod error;
mod http;
pub mod sse;

pub use api::{
    Exemption, LogSnapshot, LogSource, ProvisioningApi, StreamEvent, SubnetAllocation,
    Subscription,
};
pub use error::{ApiError, FailureKind};
pub use http::{HttpApi, HttpConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApiCall, ApiOp, FakeLogSource, FakeProvisioningApi};
