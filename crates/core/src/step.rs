// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Orchestration step names, latency classes, and history records.

use serde::{Deserialize, Serialize};

/// The remote operations a plan can chain together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Ensure a policy exemption exists for the cluster.
    EnsureExemption,
    /// Suggest and create the master/worker subnet pair.
    AllocateSubnets,
    /// Render and deliver the install configuration to the installer host.
    PushConfig,
    /// Start the install job.
    StartInstall,
    /// Start the destroy job.
    Destroy,
}

crate::simple_display! {
    StepName {
        EnsureExemption => "ensure-exemption",
        AllocateSubnets => "allocate-subnets",
        PushConfig => "push-config",
        StartInstall => "start-install",
        Destroy => "destroy",
    }
}

impl StepName {
    /// Whether an "already exists" answer from the service counts as success.
    pub fn idempotent_on_conflict(&self) -> bool {
        match self {
            StepName::EnsureExemption => true,
            StepName::AllocateSubnets
            | StepName::PushConfig
            | StepName::StartInstall
            | StepName::Destroy => false,
        }
    }

    /// Expected latency of the step, used to pick its timeout.
    pub fn latency(&self) -> LatencyClass {
        match self {
            StepName::EnsureExemption | StepName::StartInstall | StepName::Destroy => {
                LatencyClass::Short
            }
            StepName::AllocateSubnets => LatencyClass::Long,
            // May boot the installer VM and wait for SSH
            StepName::PushConfig => LatencyClass::Provisioning,
        }
    }
}

/// Timeout bucket for a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyClass {
    /// Auth and metadata calls.
    Short,
    /// Calls that wait on a cloud control-plane operation.
    Long,
    /// Calls that may start a host and wait for it to become reachable.
    Provisioning,
}

crate::simple_display! {
    LatencyClass {
        Short => "short",
        Long => "long",
        Provisioning => "provisioning",
    }
}

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed,
    Failed { message: String },
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }
}

/// Record of a step execution, kept for the lifetime of one plan run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: StepName,
    pub started_at_ms: u64,
    pub finished_at_ms: u64,
    pub outcome: StepOutcome,
}

impl StepRecord {
    pub fn duration_ms(&self) -> u64 {
        self.finished_at_ms.saturating_sub(self.started_at_ms)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
