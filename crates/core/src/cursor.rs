// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume cursor for a job's log stream.

use crate::job::JobId;
use serde::{Deserialize, Serialize};

/// The active job and the highest sequence number handed to the display.
///
/// `last_seq == 0` means nothing has been delivered yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub last_seq: u64,
}

impl Cursor {
    pub fn for_job(job_id: JobId) -> Self {
        Self { job_id: Some(job_id), last_seq: 0 }
    }

    /// Advance to `seq`. Returns false (and leaves the cursor alone) when
    /// `seq` would move it backwards.
    pub fn advance(&mut self, seq: u64) -> bool {
        if seq < self.last_seq {
            return false;
        }
        self.last_seq = seq;
        true
    }

    /// Whether a line with this sequence number was already delivered.
    pub fn has_seen(&self, seq: u64) -> bool {
        seq <= self.last_seq
    }
}
