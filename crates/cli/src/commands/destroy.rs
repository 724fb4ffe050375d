// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `shift destroy` - Tear down a cluster behind a hold-to-confirm countdown

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use shift_core::{ConfirmGate, GestureSnapshot, SystemClock};
use shift_engine::{hold_to_confirm, HoldOutcome, JobOrchestrator};

use crate::env;
use crate::exit_error::ExitError;
use crate::output::{self, follow, format_hold, print_steps};

/// Countdown redraw period
const TICK: Duration = Duration::from_millis(50);

#[derive(Args)]
pub struct DestroyArgs {
    /// Cluster name
    pub name: String,

    /// Skip the confirmation countdown
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Start the destroy and exit without streaming its log
    #[arg(long)]
    pub no_follow: bool,

    /// Reconnect attempts after a dropped log stream
    #[arg(long, default_value_t = 3)]
    pub reconnect: u32,
}

pub async fn handle(args: DestroyArgs) -> Result<()> {
    let api = super::connect()?;
    let (mut client, mut updates) = super::stream_client(&api)?;
    let orchestrator = JobOrchestrator::new(api, SystemClock).with_timeouts(env::step_timeouts());

    let result = if args.yes {
        orchestrator.destroy(&args.name, &mut client).await
    } else {
        let label = format!("Destroying {}", args.name);
        let mut gate = ConfirmGate::new(env::hold_threshold()).with_observer(
            move |snapshot: &GestureSnapshot| {
                let mut err = std::io::stderr().lock();
                let _ = write!(err, "{}", format_hold(&label, snapshot));
                let _ = err.flush();
            },
        );
        let release = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        let plan = &orchestrator;
        let stream = &mut client;
        let name = args.name.as_str();
        match hold_to_confirm(&mut gate, TICK, release, move || plan.destroy(name, stream)).await {
            HoldOutcome::Confirmed(result) => result,
            HoldOutcome::Cancelled => {
                eprintln!();
                return Err(ExitError::cancelled("destroy cancelled").into());
            }
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let shift_engine::PlanError::Step { steps, .. } = &e {
                print_steps(steps);
            }
            return Err(ExitError::from(e).into());
        }
    };
    print_steps(&report.steps);
    eprintln!("Destroy job {}", report.job.id);

    if args.no_follow {
        client.detach();
        return Ok(());
    }
    let end = follow(&mut client, &mut updates, args.reconnect).await?;
    output::finish(end)
}
