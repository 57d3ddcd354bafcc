// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conditional polling: repeat an operation until a predicate holds.

use crate::clock::Clock;
use crate::error::ExecError;
use std::future::Future;
use std::time::Duration;

/// Polling configuration
#[derive(Debug, Clone)]
pub struct PollSpec {
    /// Total budget for the poll
    pub max_duration: Duration,
    /// Delay between evaluations
    pub interval: Duration,
}

impl PollSpec {
    pub fn new(max_duration: Duration, interval: Duration) -> Self {
        Self {
            max_duration,
            interval,
        }
    }
}

/// Poll `op` until `condition` accepts its result.
///
/// The first evaluation happens immediately, and at least one evaluation is
/// performed even when `interval` exceeds the remaining budget or the
/// budget is zero. An operation failure signals
/// [`ExecError::PollingExecutable`] at once; a predicate failure signals
/// [`ExecError::PollingCondition`]; an exhausted budget signals
/// [`ExecError::PollingTimeout`]. Evaluations are strictly sequential.
pub async fn poll<T, C, F, Fut>(
    spec: &PollSpec,
    clock: &impl Clock,
    mut op: F,
    mut condition: C,
) -> Result<T, ExecError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExecError>>,
    C: FnMut(&T) -> Result<bool, ExecError>,
{
    let start = clock.now();

    loop {
        let value = match op().await {
            Ok(v) => v,
            Err(e) => {
                return Err(ExecError::PollingExecutable {
                    source: Box::new(e),
                })
            }
        };

        match condition(&value) {
            Ok(true) => return Ok(value),
            Ok(false) => {}
            Err(e) => {
                return Err(ExecError::PollingCondition {
                    source: Box::new(e),
                })
            }
        }

        if clock.now().duration_since(start) >= spec.max_duration {
            return Err(ExecError::PollingTimeout {
                max_duration: spec.max_duration,
            });
        }

        tokio::time::sleep(spec.interval).await;
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
