// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::LogLine;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for log sequences.
pub mod strategies {
    use crate::LogLine;
    use proptest::prelude::*;

    /// Lines with strictly increasing sequence numbers starting at 1 or
    /// later, with random gaps (heartbeats carry no sequence number).
    pub fn arb_log_lines(max_len: usize) -> impl Strategy<Value = Vec<LogLine>> {
        proptest::collection::vec((1u64..4, "[a-z ]{1,12}"), 0..max_len).prop_map(|items| {
            let mut seq = 0;
            items
                .into_iter()
                .map(|(gap, text)| {
                    seq += gap;
                    LogLine::new(seq, text)
                })
                .collect()
        })
    }
}

// ── Line factories ──────────────────────────────────────────────────────

/// Lines `from..=to` with text `line {seq}`.
pub fn numbered_lines(from: u64, to: u64) -> Vec<LogLine> {
    (from..=to).map(|seq| LogLine::new(seq, format!("line {seq}"))).collect()
}
