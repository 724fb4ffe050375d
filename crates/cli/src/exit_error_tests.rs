// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shift_core::{SpecError, StepName};
use yare::parameterized;

#[parameterized(
    unauthenticated = { ApiError::Unauthenticated("session expired".into()), codes::UNAUTHENTICATED },
    forbidden = { ApiError::Forbidden("User role required".into()), codes::FORBIDDEN },
    conflict = {
        ApiError::NameConflict { names: vec!["foo-master-subnet".into()], message: "exists".into() },
        codes::NAME_CONFLICT
    },
    transport = { ApiError::Transport("reset".into()), codes::FAILURE },
    timeout = { ApiError::Timeout { after_ms: 30_000 }, codes::FAILURE },
    malformed = { ApiError::Malformed { status: 502, detail: "not json".into() }, codes::FAILURE },
)]
fn api_errors_map_to_exit_codes(error: ApiError, code: i32) {
    assert_eq!(ExitError::from(&error).code, code);
}

#[test]
fn conflict_message_names_the_subnet() {
    let err = ExitError::from(PlanError::Step {
        step: StepName::AllocateSubnets,
        error: ApiError::NameConflict {
            names: vec!["foo-master-subnet".into()],
            message: "Subnet name already exists".into(),
        },
        steps: Vec::new(),
    });
    assert_eq!(err.code, codes::NAME_CONFLICT);
    assert!(err.message.starts_with("allocate-subnets: "), "{}", err.message);
    assert!(err.message.contains("foo-master-subnet"), "{}", err.message);
}

#[test]
fn invalid_spec_is_a_plain_failure() {
    let err = ExitError::from(PlanError::Invalid(SpecError::WorkerReplicas(9)));
    assert_eq!(err.code, codes::FAILURE);
    assert_eq!(err.to_string(), "worker replicas must be between 2 and 6, got 9");
}
