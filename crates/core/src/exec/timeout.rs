// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline-bounded execution with a configurable timeout disposition.

use super::Disposition;
use crate::adapters::{Notice, Notifier};
use crate::error::ExecError;
use std::future::Future;
use std::time::Duration;

/// Timeout configuration
#[derive(Debug, Clone)]
pub struct TimeoutSpec {
    /// Wall-clock budget for the wrapped operation
    pub max_timeout: Duration,
    /// Reaction when the budget is exceeded
    pub on_timeout: Disposition,
    /// When false, the operation runs inline with no deadline
    pub enabled: bool,
    /// Notice dispatched when `on_timeout` is `Warn`
    pub notify: Option<Notice>,
}

impl TimeoutSpec {
    pub fn new(max_timeout: Duration, on_timeout: Disposition) -> Self {
        Self {
            max_timeout,
            on_timeout,
            enabled: true,
            notify: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            max_timeout: Duration::ZERO,
            on_timeout: Disposition::Raise,
            enabled: false,
            notify: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notify = Some(notice);
        self
    }
}

/// Run `op` under a wall-clock deadline on its own worker task.
///
/// Completion within the deadline yields `Ok(Some(value))`; an operation
/// failure before the deadline propagates unchanged. When the deadline
/// elapses: `Raise` abandons the still-running task and signals
/// [`ExecError::Timeout`]; `Warn` dispatches the configured notice and
/// returns `Ok(None)` so the caller continues; `Skip` returns `Ok(None)`
/// silently. A disabled spec runs the operation inline with no deadline.
///
/// Abandonment is best-effort: the task is aborted at its next yield
/// point. An operation supervising its own subprocess must additionally be
/// stopped through that process's termination path.
pub async fn with_timeout<T, N, F, Fut>(
    spec: &TimeoutSpec,
    notifier: &N,
    op: F,
) -> Result<Option<T>, ExecError>
where
    T: Send + 'static,
    N: Notifier,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ExecError>> + Send + 'static,
{
    if !spec.enabled {
        return op().await.map(Some);
    }

    let mut handle = tokio::spawn(op());
    match tokio::time::timeout(spec.max_timeout, &mut handle).await {
        Ok(Ok(result)) => result.map(Some),
        Ok(Err(join)) => match join.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(_) => Err(ExecError::Timeout {
                limit: spec.max_timeout,
            }),
        },
        Err(_) => on_deadline(spec, notifier, handle).await,
    }
}

async fn on_deadline<T, N>(
    spec: &TimeoutSpec,
    notifier: &N,
    handle: tokio::task::JoinHandle<Result<T, ExecError>>,
) -> Result<Option<T>, ExecError>
where
    N: Notifier,
{
    handle.abort();

    match spec.on_timeout {
        Disposition::Raise => Err(ExecError::Timeout {
            limit: spec.max_timeout,
        }),
        Disposition::Warn => {
            if let Some(notice) = &spec.notify {
                if let Err(e) = notifier.send(notice).await {
                    tracing::error!(error = %e, "timeout notification failed");
                }
            }
            tracing::warn!(limit = ?spec.max_timeout, "operation timed out, continuing");
            Ok(None)
        }
        Disposition::Skip => {
            tracing::debug!(limit = ?spec.max_timeout, "operation timed out, skipped");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
