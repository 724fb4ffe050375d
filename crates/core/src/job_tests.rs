// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_id_display() {
    let id = JobId::new("job-123");
    assert_eq!(id.to_string(), "job-123");
}

#[test]
fn new_job_is_not_terminal() {
    let job = Job::new(JobId::new("job-1"), JobKind::Create);
    assert!(!job.is_terminal());
    assert_eq!(job.outcome, None);
}

#[test]
fn first_outcome_wins() {
    let mut job = Job::new(JobId::new("job-1"), JobKind::Destroy);
    assert!(job.finish(JobOutcome::Succeeded));
    assert!(!job.finish(JobOutcome::Failed { message: "late".into() }));
    assert_eq!(job.outcome, Some(JobOutcome::Succeeded));
    assert!(job.is_terminal());
}

#[yare::parameterized(
    create  = { JobKind::Create,  "create" },
    destroy = { JobKind::Destroy, "destroy" },
)]
fn job_kind_display(kind: JobKind, expected: &str) {
    assert_eq!(kind.to_string(), expected);
}

#[test]
fn status_parses_service_json() {
    let status: JobStatus = serde_json::from_str(
        r#"{"ok": true, "done": true, "exitCode": 0, "error": null, "lastSeq": 812}"#,
    )
    .unwrap();
    assert_eq!(status, JobStatus { done: true, exit_code: Some(0), error: None, last_seq: 812 });
}

#[yare::parameterized(
    running      = { false, None,    None,                 None },
    clean_exit   = { true,  Some(0), None,                 Some(JobOutcome::Succeeded) },
    no_exit_code = { true,  None,    None,                 Some(JobOutcome::Succeeded) },
    bad_exit     = { true,  Some(2), None,                 Some(JobOutcome::Failed { message: "exit code 2".into() }) },
    error_text   = { true,  None,    Some("ssh refused"),  Some(JobOutcome::Failed { message: "ssh refused".into() }) },
)]
fn status_outcome(done: bool, exit_code: Option<i32>, error: Option<&str>, expected: Option<JobOutcome>) {
    let status = JobStatus { done, exit_code, error: error.map(String::from), last_seq: 0 };
    assert_eq!(status.outcome(), expected);
}
