//! Persisted cursor specs
//!
//! Verify `shift cursor` reads and resets the state file.

use crate::prelude::*;

#[test]
fn fresh_state_has_no_active_job() {
    let temp = Project::empty();
    temp.shift().args(&["cursor", "show"]).passes().stdout_has("no active job");
}

#[test]
fn show_reports_job_and_last_line() {
    let temp = Project::empty();
    temp.cursor("job-7", 3);
    temp.shift().args(&["cursor", "show"]).passes().stdout_has("job-7 at line 3");
}

#[test]
fn show_as_json() {
    let temp = Project::empty();
    temp.cursor("job-7", 3);
    let run = temp.shift().args(&["cursor", "show", "-o", "json"]).passes();

    let value: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();
    assert_eq!(value["job_id"], "job-7");
    assert_eq!(value["last_seq"], 3);
}

#[test]
fn clear_forgets_the_job() {
    let temp = Project::empty();
    temp.cursor("job-7", 3);

    temp.shift().args(&["cursor", "clear"]).passes().stdout_has("cursor cleared");
    temp.shift().args(&["cursor", "show"]).passes().stdout_has("no active job");
    assert!(!temp.read("cursor.json").contains("job-7"));
}

#[test]
fn corrupt_state_file_starts_fresh() {
    let temp = Project::empty();
    temp.file("cursor.json", "{ not json");

    temp.shift().args(&["cursor", "show"]).passes().stdout_has("no active job");
    assert_eq!(temp.read("cursor.bak"), "{ not json");
}
