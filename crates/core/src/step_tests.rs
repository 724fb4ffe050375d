// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    exemption = { StepName::EnsureExemption, true },
    subnets   = { StepName::AllocateSubnets, false },
    config    = { StepName::PushConfig,      false },
    install   = { StepName::StartInstall,    false },
    destroy   = { StepName::Destroy,         false },
)]
fn only_exemption_tolerates_existing(step: StepName, expected: bool) {
    assert_eq!(step.idempotent_on_conflict(), expected);
}

#[test]
fn push_config_has_the_longest_latency_class() {
    assert_eq!(StepName::PushConfig.latency(), LatencyClass::Provisioning);
    assert_eq!(StepName::EnsureExemption.latency(), LatencyClass::Short);
}

#[test]
fn step_name_display_is_kebab_case() {
    assert_eq!(StepName::AllocateSubnets.to_string(), "allocate-subnets");
}

#[test]
fn record_duration_saturates() {
    let record = StepRecord {
        name: StepName::Destroy,
        started_at_ms: 500,
        finished_at_ms: 200,
        outcome: StepOutcome::Completed,
    };
    assert_eq!(record.duration_ms(), 0);
}
