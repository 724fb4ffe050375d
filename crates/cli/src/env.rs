// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use shift_adapters::HttpConfig;
use shift_engine::{StepTimeouts, StreamConfig};

use crate::exit_error::ExitError;

/// Service base URL (`SHIFT_API_URL`, default `http://localhost:5000`)
pub fn api_url() -> String {
    std::env::var("SHIFT_API_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "http://localhost:5000".to_string())
}

/// Session token sent with every request (`SHIFT_TOKEN`)
pub fn token() -> Option<String> {
    std::env::var("SHIFT_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Log filter override (`SHIFT_LOG`), takes precedence over `--log-level`
pub fn log_filter() -> Option<String> {
    std::env::var("SHIFT_LOG").ok().filter(|s| !s.is_empty())
}

/// Resolve state directory: SHIFT_STATE_DIR > XDG_STATE_HOME/shift > ~/.local/state/shift
pub fn state_dir() -> Result<PathBuf, ExitError> {
    if let Ok(dir) = std::env::var("SHIFT_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("shift"));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| ExitError::new(1, "cannot find a state directory; set SHIFT_STATE_DIR"))?;
    Ok(home.join(".local/state/shift"))
}

/// File holding the persisted stream cursor
pub fn cursor_path() -> Result<PathBuf, ExitError> {
    Ok(state_dir()?.join("cursor.json"))
}

fn duration_ms(var: &str, default: Duration) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

/// Log flush interval (default 100ms)
pub fn flush_interval() -> Duration {
    duration_ms("SHIFT_FLUSH_MS", Duration::from_millis(100))
}

/// Visible lines kept while following (default 5000)
pub fn max_lines() -> usize {
    std::env::var("SHIFT_MAX_LINES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(5000)
}

/// Hold duration before a destroy fires (default 1.5s)
pub fn hold_threshold() -> Duration {
    duration_ms("SHIFT_HOLD_MS", Duration::from_millis(1500))
}

pub fn stream_config() -> StreamConfig {
    StreamConfig::default().flush_interval(flush_interval()).max_lines(max_lines())
}

pub fn step_timeouts() -> StepTimeouts {
    let defaults = StepTimeouts::default();
    StepTimeouts::default()
        .short(duration_ms("SHIFT_SHORT_TIMEOUT_MS", defaults.short))
        .long(duration_ms("SHIFT_LONG_TIMEOUT_MS", defaults.long))
        .provisioning(duration_ms("SHIFT_PROVISION_TIMEOUT_MS", defaults.provisioning))
}

pub fn http_config() -> HttpConfig {
    let config = HttpConfig::new(api_url())
        .read_timeout(duration_ms("SHIFT_SHORT_TIMEOUT_MS", StepTimeouts::default().short));
    match token() {
        Some(token) => config.token(token),
        None => config,
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
