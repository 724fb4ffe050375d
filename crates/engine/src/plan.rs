// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential create/destroy plans against the provisioning service.
//!
//! Steps run strictly in order and the first failure ends the plan.
//! Completed steps are not undone, and nothing is retried.

use crate::stream::JobAttach;
use shift_adapters::{ApiError, Exemption, ProvisioningApi, SubnetAllocation};
use shift_core::{
    Clock, ClusterSpec, Job, JobKind, LatencyClass, SpecError, StepName, StepOutcome, StepRecord,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-latency-class step timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimeouts {
    pub short: Duration,
    pub long: Duration,
    pub provisioning: Duration,
}

impl Default for StepTimeouts {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(30),
            long: Duration::from_secs(120),
            provisioning: Duration::from_secs(900),
        }
    }
}

impl StepTimeouts {
    shift_core::setters! {
        set {
            short: Duration,
            long: Duration,
            provisioning: Duration,
        }
    }

    pub fn for_class(&self, class: LatencyClass) -> Duration {
        match class {
            LatencyClass::Short => self.short,
            LatencyClass::Long => self.long,
            LatencyClass::Provisioning => self.provisioning,
        }
    }
}

/// Why a plan stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Rejected locally before any remote step ran.
    #[error("invalid cluster request: {0}")]
    Invalid(#[from] SpecError),
    /// A remote step failed. `steps` holds every executed step, the
    /// failed one last; earlier steps' effects remain in place.
    #[error("{step} failed: {error}")]
    Step { step: StepName, error: ApiError, steps: Vec<StepRecord> },
}

impl PlanError {
    /// The underlying service error, if a remote step failed.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            PlanError::Invalid(_) => None,
            PlanError::Step { error, .. } => Some(error),
        }
    }

    /// Steps that completed before the failure.
    pub fn completed(&self) -> Vec<StepName> {
        match self {
            PlanError::Invalid(_) => Vec::new(),
            PlanError::Step { steps, .. } => {
                steps.iter().filter(|r| r.outcome.is_completed()).map(|r| r.name).collect()
            }
        }
    }
}

/// Result of a successful plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub job: Job,
    pub steps: Vec<StepRecord>,
    pub exemption: Option<Exemption>,
    pub subnets: Option<SubnetAllocation>,
}

/// Runs create and destroy plans and hands the resulting job to a log
/// stream.
pub struct JobOrchestrator<P, C> {
    api: Arc<P>,
    clock: C,
    timeouts: StepTimeouts,
}

impl<P: ProvisioningApi, C: Clock> JobOrchestrator<P, C> {
    pub fn new(api: Arc<P>, clock: C) -> Self {
        Self { api, clock, timeouts: StepTimeouts::default() }
    }

    pub fn with_timeouts(mut self, timeouts: StepTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Exemption, subnets, config push, install start; then attach.
    pub async fn create(
        &self,
        spec: &ClusterSpec,
        stream: &mut impl JobAttach,
    ) -> Result<PlanReport, PlanError> {
        spec.validate()?;
        let name = spec.cluster_name.as_str();
        tracing::info!(cluster = name, "create plan started");

        let mut run = PlanRun::new(&self.clock, &self.timeouts);
        let api = &self.api;

        let exemption = run
            .step(StepName::EnsureExemption, async {
                match api.ensure_exemption(name).await {
                    Err(ApiError::NameConflict { .. })
                        if StepName::EnsureExemption.idempotent_on_conflict() =>
                    {
                        Ok(existing_exemption())
                    }
                    result => result,
                }
            })
            .await?;
        if !exemption.created {
            tracing::info!(cluster = name, "policy exemption already present");
        }

        let subnets = run
            .step(StepName::AllocateSubnets, async {
                let pair = api.suggest_subnets(name).await?;
                api.create_subnets(name, &pair).await
            })
            .await?;

        run.step(StepName::PushConfig, api.push_config(spec, &subnets.pair)).await?;

        let job_id = run.step(StepName::StartInstall, api.start_install(name)).await?;

        tracing::info!(cluster = name, %job_id, "install started");
        stream.attach(job_id.clone());
        Ok(PlanReport {
            job: Job::new(job_id, JobKind::Create),
            steps: run.records,
            exemption: Some(exemption),
            subnets: Some(subnets),
        })
    }

    /// Request destruction by name; then attach.
    pub async fn destroy(
        &self,
        cluster: &str,
        stream: &mut impl JobAttach,
    ) -> Result<PlanReport, PlanError> {
        let cluster = cluster.trim();
        if cluster.is_empty() {
            return Err(SpecError::EmptyName.into());
        }
        tracing::info!(cluster, "destroy plan started");

        let mut run = PlanRun::new(&self.clock, &self.timeouts);
        let job_id = run.step(StepName::Destroy, self.api.destroy(cluster)).await?;

        tracing::info!(cluster, %job_id, "destroy started");
        stream.attach(job_id.clone());
        Ok(PlanReport {
            job: Job::new(job_id, JobKind::Destroy),
            steps: run.records,
            exemption: None,
            subnets: None,
        })
    }
}

fn existing_exemption() -> Exemption {
    Exemption { created: false, exemption_id: None, exemption_name: None, expires_on: None }
}

/// Step history for one plan invocation.
struct PlanRun<'a, C> {
    clock: &'a C,
    timeouts: &'a StepTimeouts,
    records: Vec<StepRecord>,
}

impl<'a, C: Clock> PlanRun<'a, C> {
    fn new(clock: &'a C, timeouts: &'a StepTimeouts) -> Self {
        Self { clock, timeouts, records: Vec::new() }
    }

    /// Run one step under its latency-class timeout and record it.
    async fn step<T>(
        &mut self,
        name: StepName,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, PlanError> {
        let limit = self.timeouts.for_class(name.latency());
        let started_at_ms = self.clock.epoch_ms();
        tracing::debug!(step = %name, timeout_ms = limit.as_millis() as u64, "step started");

        let result = match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::timeout(limit)),
        };
        let finished_at_ms = self.clock.epoch_ms();

        match result {
            Ok(value) => {
                tracing::info!(step = %name, elapsed_ms = finished_at_ms.saturating_sub(started_at_ms), "step completed");
                self.records.push(StepRecord {
                    name,
                    started_at_ms,
                    finished_at_ms,
                    outcome: StepOutcome::Completed,
                });
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(step = %name, kind = %error.kind(), error = %error, "step failed, plan halted");
                self.records.push(StepRecord {
                    name,
                    started_at_ms,
                    finished_at_ms,
                    outcome: StepOutcome::Failed { message: error.to_string() },
                });
                Err(PlanError::Step { step: name, error, steps: std::mem::take(&mut self.records) })
            }
        }
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
