// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and terminal-state tracking.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of an asynchronous install or destroy job.
    ///
    /// Issued by the service when a job starts; used as the key for log
    /// snapshots, live streams, and the persisted cursor.
    pub struct JobId;
}

/// What a job does to its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Create,
    Destroy,
}

crate::simple_display! {
    JobKind {
        Create => "create",
        Destroy => "destroy",
    }
}

/// How a job finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Succeeded,
    Failed { message: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }
}

crate::simple_display! {
    JobOutcome {
        Succeeded => "succeeded",
        Failed { .. } => "failed",
    }
}

/// Client-side view of a job.
///
/// Never deleted by the client: a terminal job keeps its logs visible until
/// the caller clears them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub outcome: Option<JobOutcome>,
}

impl Job {
    pub fn new(id: JobId, kind: JobKind) -> Self {
        Self { id, kind, outcome: None }
    }

    /// A job is terminal once any outcome has been recorded.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the terminal outcome. The first outcome wins.
    pub fn finish(&mut self, outcome: JobOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}

/// Server-reported job status (`GET /api/installer/status/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub last_seq: u64,
}

impl JobStatus {
    /// Outcome implied by this status, if the job has finished.
    pub fn outcome(&self) -> Option<JobOutcome> {
        if !self.done {
            return None;
        }
        match (&self.error, self.exit_code) {
            (Some(message), _) => Some(JobOutcome::Failed { message: message.clone() }),
            (None, Some(code)) if code != 0 => {
                Some(JobOutcome::Failed { message: format!("exit code {code}") })
            }
            _ => Some(JobOutcome::Succeeded),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
