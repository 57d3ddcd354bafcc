// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use sluice_core::{Notice, Notifier, NotifyError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Fake transport that records dispatched notices
#[derive(Clone, Default)]
pub struct FakeNotifier {
    sent: Arc<Mutex<Vec<Notice>>>,
    fail: Arc<AtomicBool>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded notices
    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make `send` fail until cleared
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("induced failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
