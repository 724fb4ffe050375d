// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `shift status` - Ask the service for a job's status

use anyhow::Result;
use clap::Args;

use shift_adapters::ProvisioningApi;
use shift_core::JobId;

use crate::exit_error::{codes, ExitError};
use crate::output::{format_status, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    /// Job ID (defaults to the last followed job)
    pub job: Option<String>,

    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

pub async fn handle(args: StatusArgs) -> Result<()> {
    let job_id = match args.job {
        Some(job) => JobId::new(job),
        None => super::open_cursor()?.job_id().cloned().ok_or_else(|| {
            ExitError::new(codes::FAILURE, "no active job; pass a job id")
        })?,
    };

    let api = super::connect()?;
    let status = api.job_status(&job_id).await.map_err(|e| ExitError::from(&e))?;
    println!("{}", format_status(job_id.as_str(), &status, args.output));
    Ok(())
}
