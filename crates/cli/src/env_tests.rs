// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear_vars() {
    for var in [
        "SHIFT_API_URL",
        "SHIFT_TOKEN",
        "SHIFT_STATE_DIR",
        "XDG_STATE_HOME",
        "SHIFT_FLUSH_MS",
        "SHIFT_MAX_LINES",
        "SHIFT_HOLD_MS",
        "SHIFT_SHORT_TIMEOUT_MS",
        "SHIFT_LONG_TIMEOUT_MS",
        "SHIFT_PROVISION_TIMEOUT_MS",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_apply_when_unset() {
    clear_vars();
    assert_eq!(api_url(), "http://localhost:5000");
    assert_eq!(token(), None);
    assert_eq!(flush_interval(), Duration::from_millis(100));
    assert_eq!(max_lines(), 5000);
    assert_eq!(hold_threshold(), Duration::from_millis(1500));
    assert_eq!(step_timeouts(), StepTimeouts::default());
}

#[test]
#[serial]
fn state_dir_prefers_explicit_then_xdg() {
    clear_vars();
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/shift"));

    std::env::set_var("SHIFT_STATE_DIR", "/tmp/explicit");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/explicit"));
    assert_eq!(cursor_path().unwrap(), PathBuf::from("/tmp/explicit/cursor.json"));
    clear_vars();
}

#[test]
#[serial]
fn timeouts_are_read_per_latency_class() {
    clear_vars();
    std::env::set_var("SHIFT_SHORT_TIMEOUT_MS", "1000");
    std::env::set_var("SHIFT_PROVISION_TIMEOUT_MS", "60000");

    let timeouts = step_timeouts();
    assert_eq!(timeouts.short, Duration::from_secs(1));
    assert_eq!(timeouts.long, StepTimeouts::default().long);
    assert_eq!(timeouts.provisioning, Duration::from_secs(60));
    clear_vars();
}

#[yare::parameterized(
    garbage = { "lots" },
    zero = { "0" },
    negative = { "-5" },
)]
#[serial]
fn bad_max_lines_falls_back(raw: &str) {
    clear_vars();
    std::env::set_var("SHIFT_MAX_LINES", raw);
    assert_eq!(max_lines(), 5000);
    clear_vars();
}

#[test]
#[serial]
fn empty_token_is_ignored() {
    clear_vars();
    std::env::set_var("SHIFT_TOKEN", "");
    assert!(http_config().token.is_none());

    std::env::set_var("SHIFT_TOKEN", "jwt");
    assert_eq!(http_config().token.as_deref(), Some("jwt"));
    clear_vars();
}
