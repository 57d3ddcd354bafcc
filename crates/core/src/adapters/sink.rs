// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sink contract.
//!
//! A sink accepts structured records classified from engine output. It must
//! be idempotently initializable: `ensure_ready` creates the storage
//! location lazily and is consulted before a job starts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity assigned to a classified log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A structured record forwarded to the sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub message: String,
    pub level: LogLevel,
    /// Identifier of the originating workflow run
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(message: impl Into<String>, level: LogLevel, source: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            source: source.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Errors from sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink location cannot be created: {0}")]
    Create(String),
    #[error("sink location is structurally incompatible: {0}")]
    Schema(String),
    #[error("unsupported sink target: {0}")]
    UnsupportedTarget(String),
    #[error("write failed: {0}")]
    Write(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for structured log delivery
#[async_trait]
pub trait LogSink: Clone + Send + Sync + 'static {
    /// Verify the sink is reachable, creating its storage lazily if absent
    async fn ensure_ready(&self) -> Result<(), SinkError>;

    /// Append one record
    async fn append(&self, record: &LogRecord) -> Result<(), SinkError>;
}
