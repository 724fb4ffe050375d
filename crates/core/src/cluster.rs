// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster creation request and local validation.
//!
//! The service enforces the same rules; validating here lets a bad request
//! fail before any remote step has side effects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors from validating a [`ClusterSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("cluster name is required")]
    EmptyName,
    #[error("invalid VM size '{0}' (allowed: {allowed})", allowed = VmSize::allowed_list())]
    InvalidVmSize(String),
    #[error("master replicas must be 3 or 5, got {0}")]
    MasterReplicas(u32),
    #[error("worker replicas must be between 2 and 6, got {0}")]
    WorkerReplicas(u32),
}

/// VM sizes the installer accepts for cluster nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmSize {
    #[serde(rename = "Standard_F8s")]
    StandardF8s,
    #[serde(rename = "Standard_D4s_v3")]
    StandardD4sV3,
    #[serde(rename = "Standard_D8s_v3")]
    StandardD8sV3,
}

impl VmSize {
    pub const ALL: [VmSize; 3] = [VmSize::StandardF8s, VmSize::StandardD4sV3, VmSize::StandardD8sV3];

    pub fn as_str(&self) -> &'static str {
        match self {
            VmSize::StandardF8s => "Standard_F8s",
            VmSize::StandardD4sV3 => "Standard_D4s_v3",
            VmSize::StandardD8sV3 => "Standard_D8s_v3",
        }
    }

    fn allowed_list() -> String {
        Self::ALL.iter().map(VmSize::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for VmSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VmSize {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s.trim())
            .ok_or_else(|| SpecError::InvalidVmSize(s.to_string()))
    }
}

/// Parameters for a cluster-creation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    pub cluster_name: String,
    pub master_vm_size: VmSize,
    pub worker_vm_size: VmSize,
    pub master_replicas: u32,
    pub worker_replicas: u32,
}

impl ClusterSpec {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into().trim().to_string(),
            master_vm_size: VmSize::StandardD8sV3,
            worker_vm_size: VmSize::StandardD4sV3,
            master_replicas: 3,
            worker_replicas: 3,
        }
    }

    crate::setters! {
        set {
            master_vm_size: VmSize,
            worker_vm_size: VmSize,
            master_replicas: u32,
            worker_replicas: u32,
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.cluster_name.trim().is_empty() {
            return Err(SpecError::EmptyName);
        }
        if !matches!(self.master_replicas, 3 | 5) {
            return Err(SpecError::MasterReplicas(self.master_replicas));
        }
        if !(2..=6).contains(&self.worker_replicas) {
            return Err(SpecError::WorkerReplicas(self.worker_replicas));
        }
        Ok(())
    }

    pub fn master_subnet_name(&self) -> String {
        format!("{}-master-subnet", self.cluster_name)
    }

    pub fn worker_subnet_name(&self) -> String {
        format!("{}-worker-subnet", self.cluster_name)
    }
}

/// A master/worker subnet pair allocated for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetPair {
    pub master: String,
    pub worker: String,
    pub master_cidr: String,
    pub worker_cidr: String,
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
