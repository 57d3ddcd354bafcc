// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow job contracts shared across crates.

use crate::adapters::{LogLevel, SinkError};
use crate::error::ExecError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// File extension expected of a workflow document.
pub const WORKFLOW_EXT: &str = "flow";

/// Execution mode for a workflow run.
///
/// Each mode maps to distinct engine invocation arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "PRODUCTION")]
    Production,
    #[serde(rename = "TEST")]
    Test,
    #[serde(rename = "RELEASE")]
    Release,
}

impl Mode {
    /// Engine command-line arguments for this mode.
    pub fn engine_args(&self) -> &'static [&'static str] {
        match self {
            Mode::Production => &["--commit"],
            Mode::Test => &["--sandbox"],
            Mode::Release => &["--commit", "--archive"],
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Production => write!(f, "PRODUCTION"),
            Mode::Test => write!(f, "TEST"),
            Mode::Release => write!(f, "RELEASE"),
        }
    }
}

/// Capability contract satisfied by a supervised workflow job.
///
/// The concrete supervisor implements this; the runner only depends on the
/// contract, so a scripted stand-in can drive its tests.
#[async_trait]
pub trait JobControl: Send + Sync {
    /// Run the job to completion.
    async fn run_job(&self) -> Result<(), ExecError>;

    /// Forward one classified record to the job's logging target.
    async fn log_record(&self, message: &str, level: LogLevel) -> Result<(), SinkError>;

    /// Stop the job, escalating from graceful to forceful termination.
    async fn stop_job(&self) -> Result<(), ExecError>;
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
