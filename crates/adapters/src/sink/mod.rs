// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sink implementations.
//!
//! The shipped sink writes JSONL files for `file://` targets; anything else
//! (SQL servers and the like) lives behind the same [`LogSink`] contract in
//! external integrations.

pub mod jsonl;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use jsonl::JsonlSink;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSink;

use sluice_core::SinkError;

/// Build a sink from a logging target.
///
/// The connection string selects the transport by scheme; only `file://`
/// is handled here.
pub fn sink_for_target(connection_string: &str, table: &str) -> Result<JsonlSink, SinkError> {
    match connection_string.split_once("://") {
        Some(("file", dir)) => Ok(JsonlSink::in_dir(dir, table)),
        _ => Err(SinkError::UnsupportedTarget(connection_string.to_string())),
    }
}
