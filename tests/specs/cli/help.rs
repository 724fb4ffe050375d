//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn shift_no_args_shows_usage_and_fails() {
    cli().fails().code(2).stderr_has("Usage:");
}

#[test]
fn shift_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("create")
        .stdout_has("destroy")
        .stdout_has("logs")
        .stdout_has("status")
        .stdout_has("cursor");
}

#[test]
fn shift_version_prints_package_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn shift_create_help_shows_sizing_flags() {
    cli()
        .args(&["create", "--help"])
        .passes()
        .stdout_has("--master-vm-size")
        .stdout_has("--workers")
        .stdout_has("--no-follow");
}

#[test]
fn shift_destroy_help_shows_confirmation_bypass() {
    cli().args(&["destroy", "--help"]).passes().stdout_has("--yes");
}

#[test]
fn shift_logs_help_shows_usage() {
    cli().args(&["logs", "--help"]).passes().stdout_has("--reconnect");
}

#[test]
fn shift_cursor_help_shows_subcommands() {
    cli().args(&["cursor", "--help"]).passes().stdout_has("show").stdout_has("clear");
}
