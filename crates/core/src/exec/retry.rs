// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy: re-invoke a failing operation with a fixed delay.

use crate::error::ExecError;
use std::future::Future;
use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetrySpec {
    /// Additional attempts allowed after the first failure
    pub max_retries: u32,
    /// Delay between consecutive attempts
    pub retry_interval: Duration,
    /// When false, the operation runs exactly once
    pub enabled: bool,
}

impl RetrySpec {
    pub fn new(max_retries: u32, retry_interval: Duration) -> Self {
        Self {
            max_retries,
            retry_interval,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            retry_interval: Duration::ZERO,
            enabled: false,
        }
    }
}

/// Invoke `op`, retrying on failure up to `max_retries` additional times
/// (so up to `max_retries + 1` invocations in total).
///
/// Sleeps `retry_interval` between consecutive attempts; there is no sleep
/// after the final failing attempt. Exhaustion wraps the last failure in
/// [`ExecError::RetryExhausted`]. A disabled spec invokes once and
/// propagates any failure unchanged.
pub async fn retry<T, F, Fut>(spec: &RetrySpec, mut op: F) -> Result<T, ExecError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExecError>>,
{
    if !spec.enabled {
        return op().await;
    }

    let mut last = match op().await {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for attempt in 1..=spec.max_retries {
        tracing::warn!(attempt, error = %last, "attempt failed, retrying");
        tokio::time::sleep(spec.retry_interval).await;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => last = e,
        }
    }

    Err(ExecError::RetryExhausted {
        max_retries: spec.max_retries,
        source: Box::new(last),
    })
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
