// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal output: streamed job lines on stdout, progress on stderr.

use std::io::Write;
use std::time::Duration;

use clap::ValueEnum;
use shift_adapters::LogSource;
use shift_core::{GateState, GestureSnapshot, JobId, JobOutcome, JobStatus, LogLine, StepRecord};
use shift_engine::{LogStreamClient, StreamUpdate};
use shift_storage::KvStore;
use tokio::sync::mpsc;

use crate::color;
use crate::exit_error::{codes, ExitError};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write line texts in order.
pub fn write_lines(out: &mut impl Write, lines: &[LogLine]) {
    for line in lines {
        let _ = writeln!(out, "{}", line.text);
    }
    let _ = out.flush();
}

/// One stderr line per executed step, e.g. `✓ push-config  4.2s`.
pub fn format_step(record: &StepRecord) -> String {
    let elapsed = color::context(&format_duration(record.duration_ms()));
    match &record.outcome {
        shift_core::StepOutcome::Completed => {
            format!("✓ {}  {}", color::header(&record.name.to_string()), elapsed)
        }
        shift_core::StepOutcome::Failed { message } => format!(
            "✗ {}  {}  {}",
            color::failure(&record.name.to_string()),
            elapsed,
            message
        ),
    }
}

pub fn print_steps(records: &[StepRecord]) {
    for record in records {
        eprintln!("{}", format_step(record));
    }
}

/// Format milliseconds as a short duration (`850ms`, `4.2s`, `3m12s`).
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}m{:02}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

pub fn describe_outcome(outcome: &JobOutcome) -> String {
    match outcome {
        JobOutcome::Succeeded => "job finished".to_string(),
        JobOutcome::Failed { message } => format!("job failed: {message}"),
    }
}

/// Render a server-reported job status.
pub fn format_status(job_id: &str, status: &JobStatus, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(status).unwrap_or_default();
            if let Some(obj) = value.as_object_mut() {
                obj.insert("jobId".to_string(), serde_json::Value::from(job_id));
            }
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Text => {
            let state = match status.outcome() {
                None => "running".to_string(),
                Some(JobOutcome::Succeeded) => "succeeded".to_string(),
                Some(JobOutcome::Failed { message }) => format!("failed ({message})"),
            };
            format!("{job_id}: {state}, last line {}", status.last_seq)
        }
    }
}

/// Progress bar for a hold-to-confirm countdown, redrawn in place.
pub fn format_hold(label: &str, snapshot: &GestureSnapshot) -> String {
    const WIDTH: usize = 20;
    let filled = (snapshot.progress() * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled.min(WIDTH)));
    match snapshot.state {
        GateState::Fired => format!("\r{label} [{bar}] confirmed\n"),
        GateState::Holding | GateState::Idle => {
            let remaining = snapshot.threshold_ms.saturating_sub(snapshot.elapsed_ms);
            format!("\r{label} [{bar}] {} (Ctrl-C to cancel)", format_duration(remaining))
        }
    }
}

/// How following a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowEnd {
    Finished(JobOutcome),
    /// Ctrl-C; the cursor was kept for `shift logs`.
    Detached,
}

/// Print stream updates until the job ends, the stream fails for good, or
/// Ctrl-C detaches.
///
/// Transport failures re-attach to the same job up to `reconnects` times,
/// resuming from the persisted cursor.
pub async fn follow<L: LogSource, K: KvStore>(
    client: &mut LogStreamClient<L, K>,
    updates: &mut mpsc::UnboundedReceiver<StreamUpdate>,
    reconnects: u32,
) -> anyhow::Result<FollowEnd> {
    follow_into(&mut std::io::stdout(), client, updates, reconnects).await
}

/// [`follow`], writing job lines to `out`. A line at or below the highest
/// sequence already written for the job is skipped.
pub async fn follow_into<L: LogSource, K: KvStore>(
    out: &mut impl Write,
    client: &mut LogStreamClient<L, K>,
    updates: &mut mpsc::UnboundedReceiver<StreamUpdate>,
    reconnects: u32,
) -> anyhow::Result<FollowEnd> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut attempts = 0;
    let mut written: Option<(JobId, u64)> = None;

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(StreamUpdate::Lines { job_id, lines }) => {
                    let after = match &written {
                        Some((id, seq)) if *id == job_id => *seq,
                        _ => 0,
                    };
                    let fresh: Vec<LogLine> = lines.into_iter().filter(|l| l.seq > after).collect();
                    if let Some(last) = fresh.last() {
                        written = Some((job_id, last.seq));
                    }
                    write_lines(out, &fresh);
                }
                Some(StreamUpdate::Terminal { outcome, .. }) => {
                    return Ok(FollowEnd::Finished(outcome));
                }
                Some(StreamUpdate::Error { job_id, error }) => {
                    if !error.is_retryable() || attempts >= reconnects {
                        return Err(ExitError::from(&error).into());
                    }
                    attempts += 1;
                    let backoff = Duration::from_secs(u64::from(attempts));
                    eprintln!(
                        "{}",
                        color::context(&format!(
                            "stream lost ({error}); reconnecting in {} ({attempts}/{reconnects})",
                            format_duration(backoff.as_millis() as u64)
                        ))
                    );
                    tokio::time::sleep(backoff).await;
                    client.attach(job_id);
                }
                None => return Err(ExitError::new(codes::FAILURE, "log stream closed").into()),
            },
            _ = &mut ctrl_c => {
                client.detach();
                eprintln!("{}", color::context("detached; resume with `shift logs`"));
                return Ok(FollowEnd::Detached);
            }
        }
    }
}

/// Exit status for a followed job.
pub fn finish(end: FollowEnd) -> anyhow::Result<()> {
    match end {
        FollowEnd::Finished(JobOutcome::Succeeded) => {
            eprintln!("{}", color::header(&describe_outcome(&JobOutcome::Succeeded)));
            Ok(())
        }
        FollowEnd::Finished(outcome) => {
            Err(ExitError::new(codes::FAILURE, describe_outcome(&outcome)).into())
        }
        FollowEnd::Detached => Ok(()),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
