// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `shift create` - Provision a cluster and follow the install log

use anyhow::Result;
use clap::Args;

use shift_core::{ClusterSpec, SystemClock, VmSize};
use shift_engine::JobOrchestrator;

use crate::env;
use crate::exit_error::ExitError;
use crate::output::{self, follow, print_steps};

#[derive(Args)]
pub struct CreateArgs {
    /// Cluster name
    pub name: String,

    /// Master node VM size
    #[arg(long, default_value = "Standard_D8s_v3")]
    pub master_vm_size: VmSize,

    /// Worker node VM size
    #[arg(long, default_value = "Standard_D4s_v3")]
    pub worker_vm_size: VmSize,

    /// Master replicas (3 or 5)
    #[arg(long, default_value_t = 3)]
    pub masters: u32,

    /// Worker replicas (2-6)
    #[arg(long, default_value_t = 3)]
    pub workers: u32,

    /// Start the install and exit without streaming its log
    #[arg(long)]
    pub no_follow: bool,

    /// Reconnect attempts after a dropped log stream
    #[arg(long, default_value_t = 3)]
    pub reconnect: u32,
}

pub async fn handle(args: CreateArgs) -> Result<()> {
    let spec = ClusterSpec::new(&args.name)
        .master_vm_size(args.master_vm_size)
        .worker_vm_size(args.worker_vm_size)
        .master_replicas(args.masters)
        .worker_replicas(args.workers);

    let api = super::connect()?;
    let (mut client, mut updates) = super::stream_client(&api)?;
    let orchestrator = JobOrchestrator::new(api, SystemClock).with_timeouts(env::step_timeouts());

    eprintln!("Creating cluster {}", spec.cluster_name);
    let report = match orchestrator.create(&spec, &mut client).await {
        Ok(report) => report,
        Err(e) => {
            if let shift_engine::PlanError::Step { steps, .. } = &e {
                print_steps(steps);
            }
            return Err(ExitError::from(e).into());
        }
    };
    print_steps(&report.steps);
    eprintln!("Install job {}", report.job.id);

    if args.no_follow {
        client.detach();
        return Ok(());
    }
    let end = follow(&mut client, &mut updates, args.reconnect).await?;
    output::finish(end)
}
