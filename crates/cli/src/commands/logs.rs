// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `shift logs` - Follow a job's log, resuming where the last run stopped

use anyhow::Result;
use clap::Args;

use shift_core::JobId;

use crate::exit_error::{codes, ExitError};
use crate::output::{self, follow};

#[derive(Args)]
pub struct LogsArgs {
    /// Job ID (defaults to the last followed job)
    pub job: Option<String>,

    /// Reconnect attempts after a dropped log stream
    #[arg(long, default_value_t = 3)]
    pub reconnect: u32,
}

pub async fn handle(args: LogsArgs) -> Result<()> {
    let api = super::connect()?;
    let (mut client, mut updates) = super::stream_client(&api)?;

    match args.job {
        Some(job) => client.attach(JobId::new(job)),
        None => {
            let Some(job_id) = client.resume() else {
                return Err(ExitError::new(
                    codes::FAILURE,
                    "no job to resume; pass a job id (see `shift logs --help`)",
                )
                .into());
            };
            eprintln!("Resuming job {job_id} from line {}", client.cursor().last_seq);
        }
    }

    let end = follow(&mut client, &mut updates, args.reconnect).await?;
    output::finish(end)
}
