// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL file sink.
//!
//! Writes one JSON-encoded record per line to `<dir>/<table>.jsonl`. The
//! storage location is created lazily; an existing file whose first record
//! does not decode is rejected as structurally incompatible.

use async_trait::async_trait;
use sluice_core::{LogRecord, LogSink, SinkError};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// File-backed JSONL log sink
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing to `<dir>/<table>.jsonl`
    pub fn in_dir(dir: impl AsRef<Path>, table: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{table}.jsonl")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for JsonlSink {
    async fn ensure_ready(&self) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SinkError::Create(format!("{}: {e}", parent.display())))?;
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                if let Some(first) = content.lines().find(|line| !line.trim().is_empty()) {
                    serde_json::from_str::<LogRecord>(first).map_err(|e| {
                        SinkError::Schema(format!("{}: {e}", self.path.display()))
                    })?;
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SinkError::Io(e)),
        }
    }

    async fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut line =
            serde_json::to_string(record).map_err(|e| SinkError::Write(e.to_string()))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
