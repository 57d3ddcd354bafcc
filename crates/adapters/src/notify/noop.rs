// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification transport.

use async_trait::async_trait;
use sluice_core::{Notice, Notifier, NotifyError};

/// Transport that drops every notice, for runs with notifications disabled
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        tracing::debug!(subject = %notice.subject, "notification dropped (noop transport)");
        Ok(())
    }
}
