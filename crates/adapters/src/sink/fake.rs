// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake log sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use sluice_core::{LogRecord, LogSink, SinkError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory sink that records appended records for assertions
#[derive(Clone, Default)]
pub struct FakeSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
    fail_ready: Arc<AtomicBool>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded log records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make `ensure_ready` fail until cleared
    pub fn set_unreachable(&self, unreachable: bool) {
        self.fail_ready.store(unreachable, Ordering::SeqCst);
    }
}

#[async_trait]
impl LogSink for FakeSink {
    async fn ensure_ready(&self) -> Result<(), SinkError> {
        if self.fail_ready.load(Ordering::SeqCst) {
            return Err(SinkError::Create("sink unreachable".to_string()));
        }
        Ok(())
    }

    async fn append(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
