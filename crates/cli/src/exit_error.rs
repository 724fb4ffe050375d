// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use shift_adapters::ApiError;
use shift_engine::PlanError;

/// Process exit codes, one per failure class the user can act on.
pub mod codes {
    pub const FAILURE: i32 = 1;
    pub const UNAUTHENTICATED: i32 = 3;
    pub const FORBIDDEN: i32 = 4;
    pub const NAME_CONFLICT: i32 = 5;
    /// Confirmation released early or interrupted
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(codes::CANCELLED, message)
    }
}

impl From<&ApiError> for ExitError {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Unauthenticated(msg) => Self::new(
                codes::UNAUTHENTICATED,
                format!("not signed in ({msg}); set SHIFT_TOKEN to a fresh session token"),
            ),
            ApiError::Forbidden(msg) => {
                Self::new(codes::FORBIDDEN, format!("your account lacks the required role ({msg})"))
            }
            ApiError::NameConflict { names, message } => Self::new(
                codes::NAME_CONFLICT,
                format!(
                    "{message}: {} already exists; choose a different cluster name",
                    names.join(", ")
                ),
            ),
            other => Self::new(codes::FAILURE, other.to_string()),
        }
    }
}

impl From<PlanError> for ExitError {
    fn from(error: PlanError) -> Self {
        match &error {
            PlanError::Invalid(e) => Self::new(codes::FAILURE, e.to_string()),
            PlanError::Step { step, error, .. } => {
                let inner = ExitError::from(error);
                Self::new(inner.code, format!("{step}: {}", inner.message))
            }
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
