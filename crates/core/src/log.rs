// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log lines and terminal-signal detection.

use crate::job::JobOutcome;
use serde::{Deserialize, Serialize};

/// Token the service emits when a job completes.
pub const DONE_TOKEN: &str = "[done]";

/// Token the service emits when a job fails.
pub const ERROR_TOKEN: &str = "[error]";

/// One line of job output, tagged with its per-job sequence number.
///
/// Sequence numbers start at 1 and are strictly increasing within a job.
/// Gaps are allowed; reordering is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub seq: u64,
    pub text: String,
}

impl LogLine {
    pub fn new(seq: u64, text: impl Into<String>) -> Self {
        Self { seq, text: text.into() }
    }
}

/// A payload that ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalSignal {
    /// `[done]`, optionally followed by `exit_code=N`.
    Done { exit_code: Option<i32> },
    Error(String),
}

impl TerminalSignal {
    /// Scan a stream payload for a completion or error token.
    ///
    /// A payload equal to or containing either token is terminal. The error
    /// token is checked first so `[error]` lines carry their message.
    pub fn scan(text: &str) -> Option<TerminalSignal> {
        if let Some(pos) = text.find(ERROR_TOKEN) {
            let message = text[pos + ERROR_TOKEN.len()..].trim();
            let message = if message.is_empty() { text.trim() } else { message };
            return Some(TerminalSignal::Error(message.to_string()));
        }
        if let Some(pos) = text.find(DONE_TOKEN) {
            let exit_code = text[pos + DONE_TOKEN.len()..]
                .split_whitespace()
                .find_map(|field| field.strip_prefix("exit_code="))
                .and_then(|code| code.parse::<i32>().ok());
            return Some(TerminalSignal::Done { exit_code });
        }
        None
    }

    /// A done signal with a non-zero exit code is a failure.
    pub fn into_outcome(self) -> JobOutcome {
        match self {
            TerminalSignal::Done { exit_code: None | Some(0) } => JobOutcome::Succeeded,
            TerminalSignal::Done { exit_code: Some(code) } => {
                JobOutcome::Failed { message: format!("exit_code={code}") }
            }
            TerminalSignal::Error(message) => JobOutcome::Failed { message },
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
