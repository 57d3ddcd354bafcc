// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config-driven runner.
//!
//! Builds one supervised workflow run from a validated configuration: sink,
//! engine, timeout guard, and failure-notification policy, in that order.
//! `stop` is invoked on every exit path - success, timeout, or failure - so
//! the subprocess never outlives the call.

use crate::engine::{JobSpec, WorkflowEngine};
use sluice_adapters::sink_for_target;
use sluice_config::{load_config, LoadError, RunConfig};
use sluice_core::{
    notify_on_failure, retry, with_timeout, ExecError, FailureNotificationSpec, JobControl,
    LogSink, Notice, Notifier, RetrySpec, TimeoutSpec,
};
use std::path::Path;
use std::time::Duration;

/// Attempts allowed while waiting for the sink to become reachable.
const SINK_RETRIES: u32 = 2;

/// Delay between sink reachability attempts.
const SINK_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// How a supervised run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The workflow ran to completion
    Completed,
    /// The deadline elapsed and the timeout disposition continued the caller
    TimedOut,
    /// A failure was caught and suppressed by the notification policy
    FailureSuppressed,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Completed => write!(f, "completed"),
            Outcome::TimedOut => write!(f, "timed out"),
            Outcome::FailureSuppressed => write!(f, "failure suppressed"),
        }
    }
}

/// Report for one finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Job identifier, e.g. `daily_sales_PRODUCTION`
    pub job: String,
    pub outcome: Outcome,
}

/// Load a configuration file and execute it.
pub async fn run_config_file<N: Notifier>(
    path: &Path,
    notifier: &N,
) -> Result<RunReport, ExecError> {
    let config = load_config(path).map_err(|e| match e {
        LoadError::Validation(errors) => ExecError::Config {
            message: errors.to_string(),
        },
        other => ExecError::Config {
            message: other.to_string(),
        },
    })?;
    run_from_config(&config, notifier).await
}

/// Execute one configured workflow run end to end.
pub async fn run_from_config<N: Notifier>(
    config: &RunConfig,
    notifier: &N,
) -> Result<RunReport, ExecError> {
    let sink = sink_for_target(&config.log_to.connection_string, &config.log_to.table)?;

    // The sink must be reachable before anything launches.
    let sink_retry = RetrySpec::new(SINK_RETRIES, SINK_RETRY_INTERVAL);
    retry(&sink_retry, || {
        let sink = sink.clone();
        async move { sink.ensure_ready().await.map_err(ExecError::from) }
    })
    .await?;

    let mut spec = JobSpec::new(&config.workflow, config.mode);
    if let Some(engine_cmd) = &config.engine_cmd {
        spec = spec.with_engine_cmd(engine_cmd);
    }
    let job = spec.job_name();
    let engine = WorkflowEngine::new(spec, sink);

    let timeout_spec = match &config.timeout {
        Some(settings) => {
            TimeoutSpec::new(settings.duration, settings.on_timeout).with_notice(address(
                config,
                Notice::new(
                    format!("workflow timed out: {job}"),
                    format!(
                        "workflow {job} exceeded its {:?} budget and was abandoned",
                        settings.duration
                    ),
                ),
            ))
        }
        None => TimeoutSpec::disabled(),
    };

    let notify_spec = FailureNotificationSpec::new(config.on_error);
    let failure_notice = address(
        config,
        Notice::new(
            format!("workflow failed: {job}"),
            format!("workflow {job} failed"),
        ),
    );

    tracing::info!(job, mode = %config.mode, "starting supervised run");
    let outcome = supervise(engine, &timeout_spec, &notify_spec, &failure_notice, notifier).await?;
    tracing::info!(job, %outcome, "supervised run finished");

    Ok(RunReport { job, outcome })
}

/// Wrap a job with the timeout guard and failure-notification policy,
/// guaranteeing `stop` on every exit path.
pub async fn supervise<J, N>(
    job: J,
    timeout_spec: &TimeoutSpec,
    notify_spec: &FailureNotificationSpec,
    failure_notice: &Notice,
    notifier: &N,
) -> Result<Outcome, ExecError>
where
    J: JobControl + Clone + Send + Sync + 'static,
    N: Notifier,
{
    let run_job = job.clone();
    let result = notify_on_failure(notify_spec, notifier, failure_notice, || async move {
        with_timeout(timeout_spec, notifier, move || async move {
            run_job.run_job().await
        })
        .await
    })
    .await;

    // Teardown on every path: the subprocess must not outlive this call.
    let stop_result = job.stop_job().await;

    let outcome = match result {
        Ok(Some(Some(()))) => Outcome::Completed,
        Ok(Some(None)) => Outcome::TimedOut,
        Ok(None) => Outcome::FailureSuppressed,
        Err(e) => {
            if let Err(stop_err) = stop_result {
                tracing::error!(error = %stop_err, "teardown failed after run error");
            }
            return Err(e);
        }
    };

    stop_result?;
    Ok(outcome)
}

/// Address a notice per the configured routing: chat channel when set,
/// admin mailboxes otherwise.
fn address(config: &RunConfig, notice: Notice) -> Notice {
    match &config.notify_channel {
        Some(channel) => notice.with_channel(channel.clone()),
        None => notice.with_recipients(config.admins.clone()),
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
