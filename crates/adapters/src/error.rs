// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from calls to the provisioning service.
///
/// Every variant is reported to the caller; none of them is fatal to the
/// client process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection failed, reset, or the stream broke mid-flight.
    #[error("network error: {0}")]
    Transport(String),
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    /// Missing or expired session; the user must sign in again.
    #[error("not signed in: {0}")]
    Unauthenticated(String),
    /// Signed in but lacking the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// A resource with the requested name already exists.
    #[error("name already in use: {}", .names.join(", "))]
    NameConflict { names: Vec<String>, message: String },
    /// The service itself is missing configuration.
    #[error("service is missing configuration: {}", .missing.join(", "))]
    MissingConfig { missing: Vec<String> },
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    /// Body was not the JSON shape we expected.
    #[error("unexpected response (HTTP {status}): {detail}")]
    Malformed { status: u16, detail: String },
}

/// Tag-only variant of [`ApiError`] for branching on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Transport,
    Timeout,
    Unauthenticated,
    Forbidden,
    NameConflict,
    MissingConfig,
    Rejected,
    Malformed,
}

shift_core::simple_display! {
    FailureKind {
        Transport => "transport",
        Timeout => "timeout",
        Unauthenticated => "unauthenticated",
        Forbidden => "forbidden",
        NameConflict => "name_conflict",
        MissingConfig => "missing_config",
        Rejected => "rejected",
        Malformed => "malformed",
    }
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Transport(_) => FailureKind::Transport,
            ApiError::Timeout { .. } => FailureKind::Timeout,
            ApiError::Unauthenticated(_) => FailureKind::Unauthenticated,
            ApiError::Forbidden(_) => FailureKind::Forbidden,
            ApiError::NameConflict { .. } => FailureKind::NameConflict,
            ApiError::MissingConfig { .. } => FailureKind::MissingConfig,
            ApiError::Rejected { .. } => FailureKind::Rejected,
            ApiError::Malformed { .. } => FailureKind::Malformed,
        }
    }

    /// Only network-level failures are worth retrying by hand.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), FailureKind::Transport | FailureKind::Timeout)
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        ApiError::Timeout { after_ms: after.as_millis() as u64 }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
