// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fakes of the provisioning service for tests.

use crate::api::{
    Exemption, LogSnapshot, LogSource, ProvisioningApi, StreamEvent, SubnetAllocation,
    Subscription,
};
use crate::error::ApiError;
use async_trait::async_trait;
use parking_lot::Mutex;
use shift_core::{ClusterSpec, JobId, JobStatus, LogLine, SubnetPair, DONE_TOKEN, ERROR_TOKEN};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Which workflow call a recorded [`ApiCall`] was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    EnsureExemption,
    SuggestSubnets,
    CreateSubnets,
    PushConfig,
    StartInstall,
    Destroy,
    JobStatus,
}

/// Recorded workflow call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    EnsureExemption { cluster: String },
    SuggestSubnets { cluster: String },
    CreateSubnets { cluster: String, pair: SubnetPair },
    PushConfig { cluster: String, pair: SubnetPair },
    StartInstall { cluster: String },
    Destroy { cluster: String },
    JobStatus { job_id: JobId },
}

impl ApiCall {
    pub fn op(&self) -> ApiOp {
        match self {
            ApiCall::EnsureExemption { .. } => ApiOp::EnsureExemption,
            ApiCall::SuggestSubnets { .. } => ApiOp::SuggestSubnets,
            ApiCall::CreateSubnets { .. } => ApiOp::CreateSubnets,
            ApiCall::PushConfig { .. } => ApiOp::PushConfig,
            ApiCall::StartInstall { .. } => ApiOp::StartInstall,
            ApiCall::Destroy { .. } => ApiOp::Destroy,
            ApiCall::JobStatus { .. } => ApiOp::JobStatus,
        }
    }
}

#[derive(Default)]
struct FakeApiState {
    calls: Vec<ApiCall>,
    failures: HashMap<ApiOp, ApiError>,
    delays: HashMap<ApiOp, Duration>,
    exemptions: HashSet<String>,
    subnets: HashMap<String, String>,
    pushed: Vec<(ClusterSpec, SubnetPair)>,
    next_job: u64,
    job_prefix: Option<String>,
    statuses: HashMap<JobId, JobStatus>,
}

/// Fake provisioning service.
///
/// Records every call, remembers the side effects of successful ones
/// (exemptions, subnets, pushed configs), and can be scripted to fail or
/// stall any call.
#[derive(Clone, Default)]
pub struct FakeProvisioningApi {
    inner: Arc<Mutex<FakeApiState>>,
}

impl FakeProvisioningApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded call kinds, in order
    pub fn ops(&self) -> Vec<ApiOp> {
        self.inner.lock().calls.iter().map(ApiCall::op).collect()
    }

    /// Make every subsequent `op` call fail with `error`.
    pub fn fail(&self, op: ApiOp, error: ApiError) {
        self.inner.lock().failures.insert(op, error);
    }

    /// Make every subsequent `op` call sleep before answering.
    pub fn stall(&self, op: ApiOp, delay: Duration) {
        self.inner.lock().delays.insert(op, delay);
    }

    /// Pre-create an exemption so ensure answers `created = false`.
    pub fn add_exemption(&self, cluster: &str) {
        self.inner.lock().exemptions.insert(cluster.to_string());
    }

    pub fn has_exemption(&self, cluster: &str) -> bool {
        self.inner.lock().exemptions.contains(cluster)
    }

    /// Pre-create a subnet so suggest reports a name conflict.
    pub fn add_subnet(&self, name: &str, cidr: &str) {
        self.inner.lock().subnets.insert(name.to_string(), cidr.to_string());
    }

    pub fn has_subnet(&self, name: &str) -> bool {
        self.inner.lock().subnets.contains_key(name)
    }

    /// Configs delivered by successful push calls
    pub fn pushed(&self) -> Vec<(ClusterSpec, SubnetPair)> {
        self.inner.lock().pushed.clone()
    }

    /// Use `prefix-N` instead of `job-N` for started jobs.
    pub fn set_job_prefix(&self, prefix: &str) {
        self.inner.lock().job_prefix = Some(prefix.to_string());
    }

    pub fn set_status(&self, job_id: &JobId, status: JobStatus) {
        self.inner.lock().statuses.insert(job_id.clone(), status);
    }

    /// Record the call, then apply any scripted stall or failure.
    async fn enter(&self, call: ApiCall) -> Result<(), ApiError> {
        let op = call.op();
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(call);
            inner.delays.get(&op).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.inner.lock().failures.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn next_job_id(&self) -> JobId {
        let mut inner = self.inner.lock();
        inner.next_job += 1;
        let prefix = inner.job_prefix.clone().unwrap_or_else(|| "job".to_string());
        JobId::new(format!("{prefix}-{}", inner.next_job))
    }
}

fn subnet_names(cluster: &str) -> (String, String) {
    (format!("{cluster}-master-subnet"), format!("{cluster}-worker-subnet"))
}

#[async_trait]
impl ProvisioningApi for FakeProvisioningApi {
    async fn ensure_exemption(&self, cluster: &str) -> Result<Exemption, ApiError> {
        self.enter(ApiCall::EnsureExemption { cluster: cluster.to_string() }).await?;
        let created = self.inner.lock().exemptions.insert(cluster.to_string());
        Ok(Exemption {
            created,
            exemption_id: Some(format!("exemption/{cluster}")),
            exemption_name: Some(format!("{cluster}-exemption")),
            expires_on: None,
        })
    }

    async fn suggest_subnets(&self, cluster: &str) -> Result<SubnetPair, ApiError> {
        self.enter(ApiCall::SuggestSubnets { cluster: cluster.to_string() }).await?;
        let inner = self.inner.lock();
        let (master, worker) = subnet_names(cluster);
        let conflicts: Vec<String> = [&master, &worker]
            .into_iter()
            .filter(|name| inner.subnets.contains_key(*name))
            .cloned()
            .collect();
        if !conflicts.is_empty() {
            return Err(ApiError::NameConflict {
                names: conflicts,
                message: "Subnet name already exists. Choose a different cluster name."
                    .to_string(),
            });
        }
        let base = inner.subnets.len() * 2;
        Ok(SubnetPair {
            master,
            worker,
            master_cidr: format!("10.0.{base}.0/24"),
            worker_cidr: format!("10.0.{}.0/24", base + 1),
        })
    }

    async fn create_subnets(
        &self,
        cluster: &str,
        pair: &SubnetPair,
    ) -> Result<SubnetAllocation, ApiError> {
        self.enter(ApiCall::CreateSubnets { cluster: cluster.to_string(), pair: pair.clone() })
            .await?;
        let mut inner = self.inner.lock();
        let mut created = [false; 2];
        for (i, (name, cidr)) in
            [(&pair.master, &pair.master_cidr), (&pair.worker, &pair.worker_cidr)]
                .into_iter()
                .enumerate()
        {
            match inner.subnets.get(name) {
                Some(existing) if existing != cidr => {
                    return Err(ApiError::NameConflict {
                        names: vec![name.clone()],
                        message: format!("Subnet exists with different CIDR ({existing})"),
                    });
                }
                Some(_) => {}
                None => {
                    inner.subnets.insert(name.clone(), cidr.clone());
                    created[i] = true;
                }
            }
        }
        Ok(SubnetAllocation {
            pair: pair.clone(),
            master_created: created[0],
            worker_created: created[1],
        })
    }

    async fn push_config(&self, spec: &ClusterSpec, pair: &SubnetPair) -> Result<(), ApiError> {
        self.enter(ApiCall::PushConfig { cluster: spec.cluster_name.clone(), pair: pair.clone() })
            .await?;
        self.inner.lock().pushed.push((spec.clone(), pair.clone()));
        Ok(())
    }

    async fn start_install(&self, cluster: &str) -> Result<JobId, ApiError> {
        self.enter(ApiCall::StartInstall { cluster: cluster.to_string() }).await?;
        Ok(self.next_job_id())
    }

    async fn destroy(&self, cluster: &str) -> Result<JobId, ApiError> {
        self.enter(ApiCall::Destroy { cluster: cluster.to_string() }).await?;
        Ok(self.next_job_id())
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        self.enter(ApiCall::JobStatus { job_id: job_id.clone() }).await?;
        Ok(self.inner.lock().statuses.get(job_id).cloned().unwrap_or_default())
    }
}

/// Capacity of each fake stream channel.
const FAKE_STREAM_CAPACITY: usize = 1024;

#[derive(Default)]
struct FakeJob {
    lines: Vec<LogLine>,
    done: bool,
    streams: Vec<mpsc::Sender<Result<StreamEvent, ApiError>>>,
}

impl FakeJob {
    fn last_seq(&self) -> u64 {
        self.lines.last().map(|l| l.seq).unwrap_or(0)
    }

    fn broadcast(&mut self, event: Result<StreamEvent, ApiError>) {
        self.streams.retain(|tx| tx.try_send(event.clone()).is_ok());
    }
}

#[derive(Default)]
struct FakeLogState {
    jobs: HashMap<JobId, FakeJob>,
    snapshot_error: Option<ApiError>,
    subscribe_errors: Vec<ApiError>,
    fail_after: Option<u64>,
    snapshots: Vec<(JobId, u64)>,
    subscriptions: Vec<(JobId, u64)>,
}

/// Fake log service.
///
/// Holds per-job line history like the real service. Subscriptions replay
/// lines after the requested sequence and then stay open for lines pushed
/// later, finishing with a `[done]` event once the job is done.
#[derive(Clone, Default)]
pub struct FakeLogSource {
    inner: Arc<Mutex<FakeLogState>>,
}

impl FakeLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line with the next sequence number and stream it to
    /// open subscriptions. Returns the assigned sequence.
    pub fn push_line(&self, job_id: &JobId, text: &str) -> u64 {
        let mut inner = self.inner.lock();
        let job = inner.jobs.entry(job_id.clone()).or_default();
        let seq = job.last_seq() + 1;
        self.push_at(job, seq, text);
        seq
    }

    /// Append a line at an explicit sequence (gaps allowed).
    pub fn push_line_at(&self, job_id: &JobId, seq: u64, text: &str) {
        let mut inner = self.inner.lock();
        let job = inner.jobs.entry(job_id.clone()).or_default();
        self.push_at(job, seq, text);
    }

    fn push_at(&self, job: &mut FakeJob, seq: u64, text: &str) {
        job.lines.push(LogLine::new(seq, text));
        job.broadcast(Ok(StreamEvent::line(seq, text)));
    }

    /// Push numbered lines `line {from}..=line {to}` at matching sequences.
    pub fn push_lines(&self, job_id: &JobId, from: u64, to: u64) {
        for seq in from..=to {
            self.push_line_at(job_id, seq, &format!("line {seq}"));
        }
    }

    /// Send an event to open subscriptions without recording it in history.
    pub fn emit_raw(&self, job_id: &JobId, event: StreamEvent) {
        if let Some(job) = self.inner.lock().jobs.get_mut(job_id) {
            job.broadcast(Ok(event));
        }
    }

    /// Mark the job done and end open streams with `[done]`.
    pub fn finish(&self, job_id: &JobId) {
        let mut inner = self.inner.lock();
        let job = inner.jobs.entry(job_id.clone()).or_default();
        job.done = true;
        let seq = job.last_seq();
        job.broadcast(Ok(StreamEvent::line(seq, DONE_TOKEN)));
        job.streams.clear();
    }

    /// Append an `[error]` line, mark the job done, and close open streams.
    pub fn fail_job(&self, job_id: &JobId, message: &str) {
        self.push_line(job_id, &format!("{ERROR_TOKEN} {message}"));
        let mut inner = self.inner.lock();
        if let Some(job) = inner.jobs.get_mut(job_id) {
            job.done = true;
            job.streams.clear();
        }
    }

    /// Send a transport error to open streams, then close them.
    pub fn break_streams(&self, job_id: &JobId) {
        if let Some(job) = self.inner.lock().jobs.get_mut(job_id) {
            job.broadcast(Err(ApiError::Transport("connection reset".to_string())));
            job.streams.clear();
        }
    }

    /// Close open streams without a terminal event.
    pub fn hang_up(&self, job_id: &JobId) {
        if let Some(job) = self.inner.lock().jobs.get_mut(job_id) {
            job.streams.clear();
        }
    }

    /// The next subscription delivers lines up to `seq`, then fails.
    pub fn fail_after(&self, seq: u64) {
        self.inner.lock().fail_after = Some(seq);
    }

    pub fn fail_snapshots(&self, error: ApiError) {
        self.inner.lock().snapshot_error = Some(error);
    }

    /// The next subscribe call fails with `error`.
    pub fn fail_next_subscribe(&self, error: ApiError) {
        self.inner.lock().subscribe_errors.push(error);
    }

    /// Recorded `(job, from_seq)` snapshot requests
    pub fn snapshots(&self) -> Vec<(JobId, u64)> {
        self.inner.lock().snapshots.clone()
    }

    /// Recorded `(job, from_seq)` subscribe requests
    pub fn subscriptions(&self) -> Vec<(JobId, u64)> {
        self.inner.lock().subscriptions.clone()
    }

    /// Number of subscriptions still held open by the fake
    pub fn open_streams(&self, job_id: &JobId) -> usize {
        self.inner
            .lock()
            .jobs
            .get_mut(job_id)
            .map(|job| {
                job.streams.retain(|tx| !tx.is_closed());
                job.streams.len()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl LogSource for FakeLogSource {
    async fn snapshot(&self, job_id: &JobId, from_seq: u64) -> Result<LogSnapshot, ApiError> {
        let mut inner = self.inner.lock();
        inner.snapshots.push((job_id.clone(), from_seq));
        if let Some(error) = &inner.snapshot_error {
            return Err(error.clone());
        }
        let Some(job) = inner.jobs.get(job_id) else {
            return Ok(LogSnapshot::default());
        };
        Ok(LogSnapshot {
            lines: job.lines.iter().filter(|l| l.seq > from_seq).cloned().collect(),
            last_seq: job.last_seq(),
            done: job.done,
        })
    }

    async fn subscribe(&self, job_id: &JobId, from_seq: u64) -> Result<Subscription, ApiError> {
        let mut inner = self.inner.lock();
        inner.subscriptions.push((job_id.clone(), from_seq));
        if !inner.subscribe_errors.is_empty() {
            return Err(inner.subscribe_errors.remove(0));
        }
        let fail_after = inner.fail_after.take();

        let (tx, rx) = mpsc::channel(FAKE_STREAM_CAPACITY);
        let job = inner.jobs.entry(job_id.clone()).or_default();
        for line in job.lines.iter().filter(|l| l.seq > from_seq) {
            if fail_after.is_some_and(|k| line.seq > k) {
                break;
            }
            let _ = tx.try_send(Ok(StreamEvent::line(line.seq, line.text.clone())));
        }

        if fail_after.is_some() {
            let _ = tx.try_send(Err(ApiError::Transport("connection reset".to_string())));
        } else if job.done {
            let _ = tx.try_send(Ok(StreamEvent::line(job.last_seq(), DONE_TOKEN)));
        } else {
            job.streams.push(tx);
        }
        Ok(Subscription::new(rx, None))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
