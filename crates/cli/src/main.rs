// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shift - provision and tear down clusters, and follow their job logs

mod color;
mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use commands::{create, cursor, destroy, logs, status};
use exit_error::ExitError;

#[derive(Parser)]
#[command(
    name = "shift",
    version,
    about = "Provision clusters and follow their install logs",
    styles = color::styles()
)]
struct Cli {
    /// Log filter for diagnostics on stderr (overridden by SHIFT_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a cluster: exemption, subnets, install config, install job
    Create(create::CreateArgs),
    /// Destroy a cluster (hold to confirm)
    Destroy(destroy::DestroyArgs),
    /// Follow a job's log
    Logs(logs::LogsArgs),
    /// Show a job's status
    Status(status::StatusArgs),
    /// Inspect or reset the persisted stream cursor
    Cursor(cursor::CursorArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli.command).await {
        if let Some(exit) = e.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("error: {}", exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("error: {e:#}");
        std::process::exit(exit_error::codes::FAILURE);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Create(args) => create::handle(args).await,
        Commands::Destroy(args) => destroy::handle(args).await,
        Commands::Logs(args) => logs::handle(args).await,
        Commands::Status(args) => status::handle(args).await,
        Commands::Cursor(args) => cursor::handle(args),
    }
}

/// Diagnostics go to stderr so stdout carries only job output.
fn init_tracing(log_level: &str) {
    let directive = env::log_filter().unwrap_or_else(|| log_level.to_string());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
