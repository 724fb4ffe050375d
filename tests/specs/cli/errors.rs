//! Failure reporting specs
//!
//! Verify commands fail with actionable messages and the right exit
//! codes without a reachable service.

use crate::prelude::*;

#[test]
fn logs_without_a_job_to_resume_fails() {
    let temp = Project::empty();
    temp.shift().args(&["logs"]).fails().code(1).stderr_has("no job to resume");
}

#[test]
fn status_without_a_job_fails() {
    let temp = Project::empty();
    temp.shift().args(&["status"]).fails().code(1).stderr_has("no active job");
}

#[test]
fn invalid_replicas_rejected_before_any_request() {
    let temp = Project::empty();
    temp.shift()
        .args(&["create", "foo", "--masters", "4"])
        .fails()
        .code(1)
        .stderr_has("master replicas must be 3 or 5, got 4");
}

#[test]
fn unknown_vm_size_is_a_usage_error() {
    cli()
        .args(&["create", "foo", "--worker-vm-size", "Standard_X1"])
        .fails()
        .code(2)
        .stderr_has("Standard_X1");
}

#[test]
fn unreachable_service_is_reported_for_status() {
    let temp = Project::empty();
    temp.cursor("job-7", 3);
    temp.shift().args(&["status"]).fails().code(1).stderr_has("error:");
}

#[test]
fn unreachable_service_fails_destroy_step() {
    let temp = Project::empty();
    temp.shift()
        .args(&["destroy", "foo", "--yes"])
        .fails()
        .code(1)
        .stderr_has("destroy");
}

#[test]
fn failed_create_leaves_cursor_untouched() {
    let temp = Project::empty();
    temp.cursor("job-7", 3);

    temp.shift().args(&["create", "foo"]).fails().code(1);
    temp.shift().args(&["cursor", "show"]).passes().stdout_has("job-7 at line 3");
}
