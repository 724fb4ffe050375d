// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter traits and the payloads they exchange.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shift_core::{ClusterSpec, JobId, JobStatus, LogLine, SubnetPair};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Result of ensuring a policy exemption.
///
/// `created == false` means an active exemption already existed, which is
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exemption {
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub exemption_id: Option<String>,
    #[serde(default)]
    pub exemption_name: Option<String>,
    #[serde(default)]
    pub expires_on: Option<String>,
}

/// Subnets created (or found with matching CIDRs) for a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetAllocation {
    pub pair: SubnetPair,
    pub master_created: bool,
    pub worker_created: bool,
}

/// Workflow calls against the provisioning service.
#[async_trait]
pub trait ProvisioningApi: Send + Sync + 'static {
    async fn ensure_exemption(&self, cluster: &str) -> Result<Exemption, ApiError>;

    /// Ask for the next free CIDR pair. Fails with
    /// [`ApiError::NameConflict`] if either subnet name is taken.
    async fn suggest_subnets(&self, cluster: &str) -> Result<SubnetPair, ApiError>;

    async fn create_subnets(
        &self,
        cluster: &str,
        pair: &SubnetPair,
    ) -> Result<SubnetAllocation, ApiError>;

    /// Render the install configuration and deliver it to the installer host.
    async fn push_config(&self, spec: &ClusterSpec, pair: &SubnetPair) -> Result<(), ApiError>;

    async fn start_install(&self, cluster: &str) -> Result<JobId, ApiError>;

    async fn destroy(&self, cluster: &str) -> Result<JobId, ApiError>;

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, ApiError>;
}

/// All lines after a starting sequence, plus job completion state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    pub lines: Vec<LogLine>,
    pub last_seq: u64,
    pub done: bool,
}

/// One event from a live log stream.
///
/// `id` is the line's sequence number. An empty `data` is a heartbeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub id: Option<u64>,
    pub data: String,
}

impl StreamEvent {
    pub fn line(seq: u64, data: impl Into<String>) -> Self {
        Self { id: Some(seq), data: data.into() }
    }

    pub fn heartbeat() -> Self {
        Self { id: None, data: String::new() }
    }

    pub fn is_heartbeat(&self) -> bool {
        self.data.is_empty()
    }
}

/// A live subscription to a job's log stream.
///
/// Events arrive in the order the service sent them. The stream ends with
/// `None` when the service closes it; dropping the subscription cancels
/// the background reader.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<Result<StreamEvent, ApiError>>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wrap a channel fed by a background reader task.
    pub fn new(
        events: mpsc::Receiver<Result<StreamEvent, ApiError>>,
        reader: Option<JoinHandle<()>>,
    ) -> Self {
        Self { events, reader }
    }

    pub async fn next(&mut self) -> Option<Result<StreamEvent, ApiError>> {
        self.events.recv().await
    }

    /// Stop the background reader and discard anything still queued.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.events.close();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Log snapshot and subscribe-from-cursor capability.
#[async_trait]
pub trait LogSource: Send + Sync + 'static {
    /// Fetch every retained line with `seq > from_seq`.
    async fn snapshot(&self, job_id: &JobId, from_seq: u64) -> Result<LogSnapshot, ApiError>;

    /// Open a live stream delivering lines with `seq > from_seq`.
    async fn subscribe(&self, job_id: &JobId, from_seq: u64) -> Result<Subscription, ApiError>;
}
