// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for autoshift client state

mod cursor;
mod kv;

pub use cursor::{CursorStore, DEFAULT_NAMESPACE};
pub use kv::{FileKvStore, KvStore, MemoryKvStore, StorageError, CURRENT_STORE_VERSION};
