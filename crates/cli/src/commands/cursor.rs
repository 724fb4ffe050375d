// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `shift cursor` - Inspect or reset the persisted stream position

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::OutputFormat;

#[derive(Args)]
pub struct CursorArgs {
    #[command(subcommand)]
    pub command: CursorCommand,
}

#[derive(Subcommand)]
pub enum CursorCommand {
    /// Show the active job and last delivered line
    Show {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Forget the active job so the next `shift logs` needs a job id
    Clear,
}

pub fn handle(args: CursorArgs) -> Result<()> {
    let mut store = super::open_cursor()?;
    match args.command {
        CursorCommand::Show { output } => {
            let cursor = store.cursor();
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cursor)?),
                OutputFormat::Text => match &cursor.job_id {
                    Some(job_id) => println!("{job_id} at line {}", cursor.last_seq),
                    None => println!("no active job"),
                },
            }
        }
        CursorCommand::Clear => {
            store.clear()?;
            println!("cursor cleared");
        }
    }
    Ok(())
}
