// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resumable log streaming for one job at a time.
//!
//! An attachment hydrates from a full snapshot, then subscribes live from
//! the persisted cursor. Received lines are buffered and moved into the
//! visible list on a fixed flush interval; the cursor only advances once
//! a flush has handed lines over.

use parking_lot::Mutex;
use shift_adapters::{ApiError, LogSource, StreamEvent};
use shift_core::{Cursor, JobId, JobOutcome, LogLine, TerminalSignal};
use shift_storage::{CursorStore, KvStore, StorageError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Flush and retention settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub flush_interval: Duration,
    /// Visible lines kept; older lines are evicted first.
    pub max_lines: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { flush_interval: Duration::from_millis(100), max_lines: 5000 }
    }
}

impl StreamConfig {
    shift_core::setters! {
        set {
            flush_interval: Duration,
            max_lines: usize,
        }
    }
}

/// Change pushed to the display subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Lines moved into the visible list by one flush, in sequence order.
    /// A line is sent at most once per job, even across re-attaches.
    Lines { job_id: JobId, lines: Vec<LogLine> },
    /// The job finished; the stream is closed.
    Terminal { job_id: JobId, outcome: JobOutcome },
    /// The stream failed. The cursor is kept so a re-attach resumes.
    Error { job_id: JobId, error: ApiError },
}

/// What the subscriber currently sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamView {
    pub job_id: Option<JobId>,
    pub lines: VecDeque<LogLine>,
    pub running: bool,
    pub outcome: Option<JobOutcome>,
    pub error: Option<ApiError>,
    /// Lines dropped from the front to stay within `max_lines`.
    pub evicted: u64,
}

/// Something that can start following a job's logs.
pub trait JobAttach {
    fn attach(&mut self, job_id: JobId);
}

struct Shared<K> {
    cursor: CursorStore<K>,
    view: StreamView,
    /// Bumped by every attach/detach. A task whose generation is stale
    /// must not touch the cursor or the view.
    generation: u64,
    /// Highest sequence sent as [`StreamUpdate::Lines`] for this job.
    /// Re-attaching rebuilds the view from history but only sends lines
    /// past this point.
    delivered: Option<(JobId, u64)>,
}

/// Owns at most one live log subscription.
pub struct LogStreamClient<L, K> {
    source: Arc<L>,
    shared: Arc<Mutex<Shared<K>>>,
    config: StreamConfig,
    updates: mpsc::UnboundedSender<StreamUpdate>,
    task: Option<JoinHandle<()>>,
}

impl<L: LogSource, K: KvStore> LogStreamClient<L, K> {
    /// Create a client and the receiver its updates are pushed to.
    pub fn new(
        source: Arc<L>,
        cursor: CursorStore<K>,
        config: StreamConfig,
    ) -> (Self, mpsc::UnboundedReceiver<StreamUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let shared =
            Shared { cursor, view: StreamView::default(), generation: 0, delivered: None };
        let client = Self {
            source,
            shared: Arc::new(Mutex::new(shared)),
            config,
            updates,
            task: None,
        };
        (client, rx)
    }

    /// Tear down any current subscription and start following `job_id`.
    pub fn attach(&mut self, job_id: JobId) {
        self.abort_task();
        let (generation, resume_from) = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.view = StreamView {
                job_id: Some(job_id.clone()),
                running: true,
                ..StreamView::default()
            };
            if shared.delivered.as_ref().is_some_and(|(id, _)| *id != job_id) {
                shared.delivered = None;
            }
            if let Err(e) = shared.cursor.set_job_id(&job_id) {
                tracing::warn!(%job_id, error = %e, "failed to persist active job");
            }
            (shared.generation, shared.cursor.last_seq())
        };
        tracing::info!(%job_id, resume_from, "attached to job log");

        let task = StreamTask {
            source: Arc::clone(&self.source),
            shared: Arc::clone(&self.shared),
            job_id,
            generation,
            config: self.config.clone(),
            updates: self.updates.clone(),
            pending: Vec::new(),
            high_water: 0,
        };
        self.task = Some(tokio::spawn(task.run()));
    }

    /// Re-attach to the job recorded in the cursor store, if any.
    pub fn resume(&mut self) -> Option<JobId> {
        let job_id = self.shared.lock().cursor.job_id().cloned()?;
        tracing::info!(%job_id, "resuming persisted job");
        self.attach(job_id.clone());
        Some(job_id)
    }

    /// Close the subscription and stop flushing. The cursor is kept.
    pub fn detach(&mut self) {
        let had_task = self.abort_task();
        let mut shared = self.shared.lock();
        shared.generation += 1;
        shared.view.running = false;
        if had_task {
            tracing::info!(job_id = ?shared.view.job_id, "detached from job log");
        }
    }

    /// Forget the persisted job and position.
    pub fn clear_cursor(&mut self) -> Result<(), StorageError> {
        self.shared.lock().cursor.clear()
    }

    /// Wait for the current attachment to end (terminal, error, or detach).
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn view(&self) -> StreamView {
        self.shared.lock().view.clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().view.running
    }

    pub fn cursor(&self) -> Cursor {
        self.shared.lock().cursor.cursor().clone()
    }

    fn abort_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl<L: LogSource, K: KvStore> JobAttach for LogStreamClient<L, K> {
    fn attach(&mut self, job_id: JobId) {
        LogStreamClient::attach(self, job_id);
    }
}

impl<L, K> Drop for LogStreamClient<L, K> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// A terminal payload and the sequence it arrived with.
struct Terminal {
    outcome: JobOutcome,
    seq: Option<u64>,
}

/// Background half of one attachment.
struct StreamTask<L, K> {
    source: Arc<L>,
    shared: Arc<Mutex<Shared<K>>>,
    job_id: JobId,
    generation: u64,
    config: StreamConfig,
    updates: mpsc::UnboundedSender<StreamUpdate>,
    /// Received but not yet flushed.
    pending: Vec<LogLine>,
    /// Highest sequence received on this attachment.
    high_water: u64,
}

impl<L: LogSource, K: KvStore> StreamTask<L, K> {
    async fn run(mut self) {
        let persisted = {
            let shared = self.shared.lock();
            if shared.generation != self.generation {
                return;
            }
            shared.cursor.last_seq()
        };

        let Some(from) = self.hydrate(persisted).await else {
            return;
        };

        let mut subscription = match self.source.subscribe(&self.job_id, from).await {
            Ok(subscription) => subscription,
            Err(e) => {
                self.fail(e);
                return;
            }
        };
        tracing::debug!(job_id = %self.job_id, from, "log stream subscribed");

        let period = self.config.flush_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = subscription.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(terminal) = self.receive(event) {
                            subscription.cancel();
                            self.terminate(terminal);
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        subscription.cancel();
                        self.fail(e);
                        return;
                    }
                    None => {
                        self.fail(ApiError::Transport(
                            "stream ended before the job finished".to_string(),
                        ));
                        return;
                    }
                },
                _ = ticker.tick() => {
                    if !self.flush() {
                        return;
                    }
                }
            }
        }
    }

    /// Replay the full history. Returns the sequence to subscribe from, or
    /// `None` if the attachment already ended.
    async fn hydrate(&mut self, persisted: u64) -> Option<u64> {
        match self.source.snapshot(&self.job_id, 0).await {
            Ok(snapshot) => {
                tracing::debug!(
                    job_id = %self.job_id,
                    lines = snapshot.lines.len(),
                    last_seq = snapshot.last_seq,
                    done = snapshot.done,
                    "snapshot fetched"
                );
                for line in snapshot.lines {
                    if let Some(terminal) = self.receive(StreamEvent::line(line.seq, line.text)) {
                        self.terminate(terminal);
                        return None;
                    }
                }
                self.high_water = self.high_water.max(snapshot.last_seq);
                if snapshot.done {
                    self.terminate(Terminal { outcome: JobOutcome::Succeeded, seq: None });
                    return None;
                }
            }
            Err(e) => {
                tracing::warn!(job_id = %self.job_id, error = %e, "snapshot failed, streaming anyway");
            }
        }

        self.high_water = self.high_water.max(persisted);
        if !self.flush() {
            return None;
        }
        Some(self.high_water)
    }

    /// Classify one event. Terminal payloads are checked before the
    /// duplicate filter since the final `[done]` reuses the last sequence.
    fn receive(&mut self, event: StreamEvent) -> Option<Terminal> {
        if let Some(signal) = TerminalSignal::scan(&event.data) {
            return Some(Terminal { outcome: signal.into_outcome(), seq: event.id });
        }
        let Some(seq) = event.id else {
            if !event.is_heartbeat() {
                tracing::debug!(job_id = %self.job_id, "dropping event without sequence");
            }
            return None;
        };
        if seq <= self.high_water {
            tracing::debug!(job_id = %self.job_id, seq, high_water = self.high_water, "duplicate line dropped");
            return None;
        }
        self.high_water = seq;
        if !event.is_heartbeat() {
            self.pending.push(LogLine::new(seq, event.data));
        }
        None
    }

    /// Move pending lines into the view and persist the cursor. Only
    /// lines the subscriber has not been sent yet go out as an update.
    ///
    /// Returns false if this attachment has been superseded.
    fn flush(&mut self) -> bool {
        let batch = std::mem::take(&mut self.pending);
        let fresh: Vec<LogLine> = {
            let mut shared = self.shared.lock();
            if shared.generation != self.generation {
                return false;
            }
            if !batch.is_empty() {
                let view = &mut shared.view;
                view.lines.extend(batch.iter().cloned());
                while view.lines.len() > self.config.max_lines {
                    view.lines.pop_front();
                    view.evicted += 1;
                }
            }
            if self.high_water > shared.cursor.last_seq() {
                if let Err(e) = shared.cursor.set_last_seq(self.high_water) {
                    tracing::warn!(job_id = %self.job_id, seq = self.high_water, error = %e, "failed to persist cursor");
                }
            }

            let sent = match &shared.delivered {
                Some((id, seq)) if *id == self.job_id => *seq,
                _ => 0,
            };
            let fresh: Vec<LogLine> = batch.into_iter().filter(|l| l.seq > sent).collect();
            if let Some(last) = fresh.last() {
                shared.delivered = Some((self.job_id.clone(), last.seq));
            }
            fresh
        };
        if !fresh.is_empty() {
            tracing::debug!(job_id = %self.job_id, count = fresh.len(), "flushed lines");
            let _ = self.updates.send(StreamUpdate::Lines { job_id: self.job_id.clone(), lines: fresh });
        }
        true
    }

    fn terminate(&mut self, terminal: Terminal) {
        if let Some(seq) = terminal.seq {
            self.high_water = self.high_water.max(seq);
        }
        if !self.finish(|view| view.outcome = Some(terminal.outcome.clone())) {
            return;
        }
        tracing::info!(job_id = %self.job_id, outcome = ?terminal.outcome, "job finished");
        let _ = self
            .updates
            .send(StreamUpdate::Terminal { job_id: self.job_id.clone(), outcome: terminal.outcome });
    }

    fn fail(&mut self, error: ApiError) {
        if !self.finish(|view| view.error = Some(error.clone())) {
            return;
        }
        tracing::warn!(
            job_id = %self.job_id,
            error = %error,
            resume_from = self.high_water,
            "log stream failed"
        );
        let _ = self.updates.send(StreamUpdate::Error { job_id: self.job_id.clone(), error });
    }

    /// Final flush, then mark the view not running.
    fn finish(&mut self, mark: impl FnOnce(&mut StreamView)) -> bool {
        if !self.flush() {
            return false;
        }
        let mut shared = self.shared.lock();
        if shared.generation != self.generation {
            return false;
        }
        shared.view.running = false;
        mark(&mut shared.view);
        true
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
