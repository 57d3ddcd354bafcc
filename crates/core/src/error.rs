// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared failure taxonomy.
//!
//! Every component signals through [`ExecError`]; callers and the failure
//! notifier match on [`ErrorKind`] tags, never on transport-specific detail.

use crate::adapters::{NotifyError, SinkError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure kind tags, compared by equality when deciding whether a caught
/// failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Polling budget exhausted without the condition succeeding
    PollingTimeout,
    /// The operation under poll failed
    PollingExecutable,
    /// The polling predicate itself failed
    PollingCondition,
    /// A time budget ran out: retries exhausted or a deadline elapsed
    RetryTimeout,
    /// Forced termination failed to stop the subprocess
    ProcessTermination,
    /// Target workflow file missing
    ProcessNotFound,
    /// Target exists but is not a workflow file
    InvalidExecutable,
    /// Log sink misconfigured or unreachable
    LoggingConfiguration,
    /// A notification transport failed
    NotificationDelivery,
    /// The workflow engine run itself failed
    Engine,
    /// Invalid run configuration
    Config,
}

/// Errors signaled by the execution-control primitives, the workflow
/// engine, and the config-driven runner.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Polling condition never satisfied within the budget
    #[error("polling condition not met within {max_duration:?}")]
    PollingTimeout { max_duration: Duration },

    /// The polled operation failed
    #[error("polled operation failed: {source}")]
    PollingExecutable {
        #[source]
        source: Box<ExecError>,
    },

    /// The polling predicate failed
    #[error("polling condition check failed: {source}")]
    PollingCondition {
        #[source]
        source: Box<ExecError>,
    },

    /// All retry attempts failed; wraps the last underlying failure
    #[error("max retries ({max_retries}) exceeded: {source}")]
    RetryExhausted {
        max_retries: u32,
        #[source]
        source: Box<ExecError>,
    },

    /// A deadline elapsed before the operation completed
    #[error("operation exceeded its {limit:?} deadline")]
    Timeout { limit: Duration },

    /// The subprocess survived a forced kill; operational hazard
    #[error("process {pid} could not be terminated")]
    ProcessTermination { pid: u32 },

    /// The workflow file does not exist
    #[error("workflow file does not exist: {}", path.display())]
    ProcessNotFound { path: PathBuf },

    /// The target exists but fails the workflow-file check
    #[error("not a valid workflow file: {}", path.display())]
    InvalidExecutable { path: PathBuf },

    /// Log sink misconfigured or unreachable
    #[error("logging configuration error: {0}")]
    LoggingConfiguration(#[from] SinkError),

    /// A notification transport failed
    #[error("notification delivery failed: {0}")]
    NotificationDelivery(#[from] NotifyError),

    /// The engine run failed: an error line was detected or the process
    /// exited abnormally
    #[error("engine failure: {message}")]
    Engine { message: String },

    /// The run configuration failed validation before execution
    #[error("invalid run configuration: {message}")]
    Config { message: String },
}

impl ExecError {
    /// The taxonomy tag for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::PollingTimeout { .. } => ErrorKind::PollingTimeout,
            ExecError::PollingExecutable { .. } => ErrorKind::PollingExecutable,
            ExecError::PollingCondition { .. } => ErrorKind::PollingCondition,
            ExecError::RetryExhausted { .. } | ExecError::Timeout { .. } => ErrorKind::RetryTimeout,
            ExecError::ProcessTermination { .. } => ErrorKind::ProcessTermination,
            ExecError::ProcessNotFound { .. } => ErrorKind::ProcessNotFound,
            ExecError::InvalidExecutable { .. } => ErrorKind::InvalidExecutable,
            ExecError::LoggingConfiguration(_) => ErrorKind::LoggingConfiguration,
            ExecError::NotificationDelivery(_) => ErrorKind::NotificationDelivery,
            ExecError::Engine { .. } => ErrorKind::Engine,
            ExecError::Config { .. } => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
