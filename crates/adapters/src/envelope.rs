// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding of the service's `{ ok, error?, missing?, conflicts?, ... }`
//! response envelope into typed payloads or classified errors.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shift_core::{LogLine, SubnetPair};

use crate::api::{LogSnapshot, SubnetAllocation};

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    missing: Vec<String>,
    #[serde(default)]
    conflicts: Vec<String>,
    /// Set on subnet-create CIDR mismatches.
    #[serde(default)]
    subnet: Option<String>,
}

/// Classify a response and, on success, decode the payload.
///
/// 401/403 are classified by status alone since auth middleware may not
/// answer with the usual envelope.
pub(crate) fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(body);

    match status {
        401 => return Err(ApiError::Unauthenticated(message_from(parsed.ok(), "session expired"))),
        403 => return Err(ApiError::Forbidden(message_from(parsed.ok(), "missing required role"))),
        _ => {}
    }

    let value = parsed.map_err(|e| ApiError::Malformed { status, detail: e.to_string() })?;
    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::Malformed { status, detail: e.to_string() })?;

    if !envelope.conflicts.is_empty() || status == 409 {
        let mut names = envelope.conflicts;
        if names.is_empty() {
            names.extend(envelope.subnet);
        }
        return Err(ApiError::NameConflict {
            names,
            message: envelope.error.unwrap_or_else(|| "name already exists".to_string()),
        });
    }
    if !envelope.missing.is_empty() {
        return Err(ApiError::MissingConfig { missing: envelope.missing });
    }
    if !envelope.ok || status >= 400 {
        return Err(ApiError::Rejected {
            status,
            message: envelope.error.unwrap_or_else(|| "request failed".to_string()),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::Malformed { status, detail: e.to_string() })
}

fn message_from(value: Option<serde_json::Value>, fallback: &str) -> String {
    value
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|v| v.as_str())
        .unwrap_or(fallback)
        .to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStarted {
    pub job_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotBody {
    #[serde(default)]
    lines: Vec<(u64, String)>,
    #[serde(default)]
    last_seq: u64,
    #[serde(default)]
    done: bool,
}

impl From<SnapshotBody> for LogSnapshot {
    fn from(body: SnapshotBody) -> Self {
        LogSnapshot {
            lines: body.lines.into_iter().map(|(seq, text)| LogLine { seq, text }).collect(),
            last_seq: body.last_seq,
            done: body.done,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedSubnet {
    pub name: String,
    pub cidr: String,
    #[serde(default)]
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubnetsCreated {
    pub master: CreatedSubnet,
    pub worker: CreatedSubnet,
}

impl From<SubnetsCreated> for SubnetAllocation {
    fn from(body: SubnetsCreated) -> Self {
        SubnetAllocation {
            master_created: body.master.created,
            worker_created: body.worker.created,
            pair: SubnetPair {
                master: body.master.name,
                worker: body.worker.name,
                master_cidr: body.master.cidr,
                worker_cidr: body.worker.cidr,
            },
        }
    }
}

/// Accept any successful envelope, ignoring extra fields.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
