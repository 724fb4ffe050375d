// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted log-stream cursor.

use crate::kv::{KvStore, StorageError};
use shift_core::{Cursor, JobId};

/// Default key namespace for the installer cursor.
pub const DEFAULT_NAMESPACE: &str = "autoshift.installer";

/// The active job id and last delivered sequence number, persisted in a
/// [`KvStore`] under a namespace.
///
/// Single writer: only the currently attached stream client writes it.
/// `last_seq` only moves forward; switching to a different job resets it.
#[derive(Debug)]
pub struct CursorStore<S> {
    store: S,
    namespace: String,
    cursor: Cursor,
}

impl<S: KvStore> CursorStore<S> {
    pub fn open(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    /// Load the cursor stored under `namespace`. Unparseable values read as
    /// an empty cursor.
    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let job_id = store
            .get(&key(&namespace, "jobId"))
            .filter(|id| !id.is_empty())
            .map(JobId::from);
        let last_seq = store
            .get(&key(&namespace, "lastSeq"))
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        Self { store, namespace, cursor: Cursor { job_id, last_seq } }
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.cursor.job_id.as_ref()
    }

    pub fn last_seq(&self) -> u64 {
        self.cursor.last_seq
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Record `seq` as delivered. Returns `Ok(false)` without writing when
    /// `seq` is behind the stored value. The in-memory cursor only moves
    /// once the store has accepted the write.
    pub fn set_last_seq(&mut self, seq: u64) -> Result<bool, StorageError> {
        if seq == self.cursor.last_seq {
            return Ok(true);
        }
        if seq < self.cursor.last_seq {
            return Ok(false);
        }
        self.store.set(&self.key("lastSeq"), &seq.to_string())?;
        self.cursor.advance(seq);
        Ok(true)
    }

    /// Make `job_id` the active job. A different job starts from sequence 0;
    /// the same job keeps its position so a re-attach resumes.
    pub fn set_job_id(&mut self, job_id: &JobId) -> Result<(), StorageError> {
        if self.cursor.job_id.as_ref() == Some(job_id) {
            return Ok(());
        }
        tracing::debug!(%job_id, previous = ?self.cursor.job_id, "cursor switched job");
        self.store.set(&self.key("jobId"), job_id.as_str())?;
        self.store.set(&self.key("lastSeq"), "0")?;
        self.cursor = Cursor::for_job(job_id.clone());
        Ok(())
    }

    /// Forget the active job and its position.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cursor = Cursor::default();
        self.store.clear(&format!("{}.", self.namespace))
    }

    fn key(&self, field: &str) -> String {
        key(&self.namespace, field)
    }
}

fn key(namespace: &str, field: &str) -> String {
    format!("{namespace}.{field}")
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
