// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the provisioning service.
//!
//! Workflow calls are plain JSON request/response. The live log stream is
//! Server-Sent Events read by a background task that forwards decoded
//! events over a channel.

use crate::api::{
    Exemption, LogSnapshot, LogSource, ProvisioningApi, StreamEvent, SubnetAllocation,
    Subscription,
};
use crate::envelope::{self, Ack, JobStarted, SnapshotBody, SubnetsCreated};
use crate::error::ApiError;
use crate::sse::SseDecoder;
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::json;
use shift_core::{ClusterSpec, JobId, JobStatus, SubnetPair};
use std::time::Duration;
use tokio::sync::mpsc;

/// Name of the session cookie the service reads its JWT from.
const SESSION_COOKIE: &str = "access_token_cookie";

/// Buffered stream events before the reader waits on the consumer.
const STREAM_CHANNEL_CAPACITY: usize = 256;

/// Connection settings for [`HttpApi`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    /// Session token sent as the service's session cookie.
    pub token: Option<String>,
    pub connect_timeout: Duration,
    /// Timeout for log snapshot and status reads.
    pub read_timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }

    shift_core::setters! {
        set {
            connect_timeout: Duration,
            read_timeout: Duration,
        }
        option {
            token: String,
        }
    }
}

/// [`ProvisioningApi`] and [`LogSource`] over HTTP.
#[derive(Clone)]
pub struct HttpApi {
    config: HttpConfig,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => {
                request.header(reqwest::header::COOKIE, format!("{SESSION_COOKIE}={token}"))
            }
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Option<Duration>,
    ) -> Result<T, ApiError> {
        let request = match timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        let response =
            self.authed(request).send().await.map_err(|e| transport_error(e, timeout))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport_error(e, timeout))?;
        envelope::decode(status, &body)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        tracing::debug!(path, "POST");
        self.send(self.client.post(self.url(path)).json(&body), None).await
    }
}

fn transport_error(e: reqwest::Error, timeout: Option<Duration>) -> ApiError {
    match timeout {
        Some(after) if e.is_timeout() => ApiError::timeout(after),
        _ => ApiError::Transport(e.to_string()),
    }
}

#[async_trait]
impl ProvisioningApi for HttpApi {
    async fn ensure_exemption(&self, cluster: &str) -> Result<Exemption, ApiError> {
        self.post("/api/policy/exemptions/ensure", json!({ "clusterName": cluster })).await
    }

    async fn suggest_subnets(&self, cluster: &str) -> Result<SubnetPair, ApiError> {
        let request =
            self.client.get(self.url("/api/subnets/suggest")).query(&[("clusterName", cluster)]);
        self.send(request, None).await
    }

    async fn create_subnets(
        &self,
        cluster: &str,
        pair: &SubnetPair,
    ) -> Result<SubnetAllocation, ApiError> {
        let body = json!({
            "clusterName": cluster,
            "masterCidr": pair.master_cidr,
            "workerCidr": pair.worker_cidr,
        });
        let created: SubnetsCreated = self.post("/api/subnets/create", body).await?;
        Ok(created.into())
    }

    async fn push_config(&self, spec: &ClusterSpec, pair: &SubnetPair) -> Result<(), ApiError> {
        let body = json!({
            "clusterName": spec.cluster_name,
            "masterCidr": pair.master_cidr,
            "workerCidr": pair.worker_cidr,
            "masterVmSize": spec.master_vm_size,
            "workerVmSize": spec.worker_vm_size,
            "masterReplicas": spec.master_replicas,
            "workerReplicas": spec.worker_replicas,
        });
        let _: Ack = self.post("/api/install-config/push", body).await?;
        Ok(())
    }

    async fn start_install(&self, cluster: &str) -> Result<JobId, ApiError> {
        let started: JobStarted =
            self.post("/api/installer/start", json!({ "clusterName": cluster })).await?;
        Ok(JobId::new(started.job_id))
    }

    async fn destroy(&self, cluster: &str) -> Result<JobId, ApiError> {
        let started: JobStarted =
            self.post("/api/clusters/destroy", json!({ "clusterName": cluster })).await?;
        Ok(JobId::new(started.job_id))
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, ApiError> {
        let request = self.client.get(self.url(&format!("/api/installer/status/{job_id}")));
        self.send(request, Some(self.config.read_timeout)).await
    }
}

#[async_trait]
impl LogSource for HttpApi {
    async fn snapshot(&self, job_id: &JobId, from_seq: u64) -> Result<LogSnapshot, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/api/installer/logs/{job_id}")))
            .query(&[("from", from_seq)]);
        let body: SnapshotBody = self.send(request, Some(self.config.read_timeout)).await?;
        Ok(body.into())
    }

    async fn subscribe(&self, job_id: &JobId, from_seq: u64) -> Result<Subscription, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("/api/installer/stream/{job_id}")))
            .query(&[("from", from_seq)])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .header("Last-Event-ID", from_seq.to_string());
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match envelope::decode::<Ack>(status.as_u16(), &body) {
                Err(e) => e,
                Ok(_) => ApiError::Rejected {
                    status: status.as_u16(),
                    message: "stream refused".to_string(),
                },
            });
        }

        tracing::info!(%job_id, from_seq, "log stream opened");
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let job_id = job_id.clone();
        let reader = tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!(%job_id, error = %e, "log stream read failed");
                        let _ = tx.send(Err(ApiError::Transport(e.to_string()))).await;
                        return;
                    }
                };
                for frame in decoder.push(&chunk) {
                    let event = StreamEvent {
                        id: frame.id.and_then(|id| id.trim().parse::<u64>().ok()),
                        data: frame.data,
                    };
                    if tx.send(Ok(event)).await.is_err() {
                        // Consumer went away
                        return;
                    }
                }
            }
            tracing::debug!(%job_id, "log stream closed by server");
        });

        Ok(Subscription::new(rx, Some(reader)))
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
