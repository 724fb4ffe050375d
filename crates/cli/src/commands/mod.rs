// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand implementations

pub mod create;
pub mod cursor;
pub mod destroy;
pub mod logs;
pub mod status;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use shift_adapters::HttpApi;
use shift_engine::{LogStreamClient, StreamUpdate};
use shift_storage::{CursorStore, FileKvStore};
use tokio::sync::mpsc;

use crate::env;
use crate::exit_error::ExitError;

pub type StreamClient = LogStreamClient<HttpApi, FileKvStore>;

/// Open the persisted cursor under the state directory.
pub fn open_cursor() -> Result<CursorStore<FileKvStore>> {
    let path = env::cursor_path()?;
    let store = FileKvStore::open(&path)
        .with_context(|| format!("failed to open cursor at {}", path.display()))?;
    Ok(CursorStore::open(store))
}

/// Build the HTTP client from the environment.
pub fn connect() -> Result<Arc<HttpApi>> {
    let api = HttpApi::new(env::http_config()).map_err(|e| ExitError::from(&e))?;
    tracing::debug!(base_url = api.base_url(), "provisioning service");
    Ok(Arc::new(api))
}

/// A stream client sharing `api`, writing the persisted cursor.
pub fn stream_client(
    api: &Arc<HttpApi>,
) -> Result<(StreamClient, mpsc::UnboundedReceiver<StreamUpdate>)> {
    Ok(LogStreamClient::new(Arc::clone(api), open_cursor()?, env::stream_config()))
}
