// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure-notification policy: turn caught failures into notifications.

use super::Disposition;
use crate::adapters::{Notice, Notifier};
use crate::error::{ErrorKind, ExecError};
use std::future::Future;

/// Which failure kinds trigger a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handle {
    /// React to any failure
    Any,
    /// React only to the listed kinds
    Kinds(Vec<ErrorKind>),
}

impl Handle {
    pub fn matches(&self, kind: ErrorKind) -> bool {
        match self {
            Handle::Any => true,
            Handle::Kinds(kinds) => kinds.contains(&kind),
        }
    }
}

/// Failure-notification configuration
#[derive(Debug, Clone)]
pub struct FailureNotificationSpec {
    /// Failure kinds to react to
    pub handle: Handle,
    /// Reaction once a matching failure is caught
    pub on_error: Disposition,
    /// When false, failures propagate untouched
    pub enabled: bool,
}

impl FailureNotificationSpec {
    pub fn new(on_error: Disposition) -> Self {
        Self {
            handle: Handle::Any,
            on_error,
            enabled: true,
        }
    }

    pub fn with_kinds(mut self, kinds: Vec<ErrorKind>) -> Self {
        self.handle = Handle::Kinds(kinds);
        self
    }

    pub fn disabled() -> Self {
        Self {
            handle: Handle::Any,
            on_error: Disposition::Raise,
            enabled: false,
        }
    }
}

/// Wrap `op`; on a failure whose kind matches the spec, dispatch exactly
/// one notification and apply the configured disposition.
///
/// `Raise` notifies, then returns the original failure; a transport
/// failure is logged and never masks it. `Warn` notifies and swallows,
/// returning `Ok(None)`; if that dispatch fails the transport error is
/// surfaced instead, since swallowing both would lose the failure entirely.
/// `Skip` swallows silently with no dispatch. Failures whose kind does not
/// match propagate untouched, as does everything when the spec is disabled.
pub async fn notify_on_failure<T, N, F, Fut>(
    spec: &FailureNotificationSpec,
    notifier: &N,
    notice: &Notice,
    op: F,
) -> Result<Option<T>, ExecError>
where
    N: Notifier,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ExecError>>,
{
    if !spec.enabled {
        return op().await.map(Some);
    }

    let error = match op().await {
        Ok(value) => return Ok(Some(value)),
        Err(e) => e,
    };

    if !spec.handle.matches(error.kind()) {
        return Err(error);
    }

    match spec.on_error {
        Disposition::Raise => {
            if let Err(send_err) = notifier.send(&describe(notice, &error)).await {
                tracing::error!(error = %send_err, "failure notification failed");
            }
            Err(error)
        }
        Disposition::Warn => {
            notifier.send(&describe(notice, &error)).await?;
            tracing::warn!(error = %error, "failure caught and suppressed");
            Ok(None)
        }
        Disposition::Skip => {
            tracing::debug!(error = %error, "failure caught and skipped");
            Ok(None)
        }
    }
}

/// Append the failure detail to the configured notice body.
fn describe(notice: &Notice, error: &ExecError) -> Notice {
    let mut described = notice.clone();
    described.body = format!("{}\n{error}", described.body);
    described
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
