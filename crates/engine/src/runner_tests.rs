// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the config-driven runner

use super::*;
use async_trait::async_trait;
use sluice_adapters::FakeNotifier;
use sluice_config::load_config_str;
use sluice_core::{Disposition, ErrorKind, LogLevel, SinkError};
use std::os::unix::fs::PermissionsExt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Copy)]
enum Behavior {
    Succeed,
    Fail,
    Hang,
}

#[derive(Clone)]
struct FakeJob {
    behavior: Behavior,
    stops: Arc<AtomicU32>,
    stop_error: bool,
}

impl FakeJob {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            stops: Arc::new(AtomicU32::new(0)),
            stop_error: false,
        }
    }

    fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobControl for FakeJob {
    async fn run_job(&self) -> Result<(), ExecError> {
        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(ExecError::Engine {
                message: "scripted failure".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }

    async fn log_record(&self, _message: &str, _level: LogLevel) -> Result<(), SinkError> {
        Ok(())
    }

    async fn stop_job(&self) -> Result<(), ExecError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.stop_error {
            return Err(ExecError::ProcessTermination { pid: 7 });
        }
        Ok(())
    }
}

fn notice() -> Notice {
    Notice::new("workflow failed", "a supervised run failed")
        .with_recipients(vec!["ops@example.com".to_string()])
}

#[tokio::test]
async fn successful_job_completes_and_is_stopped() {
    let job = FakeJob::new(Behavior::Succeed);
    let notifier = FakeNotifier::new();

    let outcome = supervise(
        job.clone(),
        &TimeoutSpec::disabled(),
        &FailureNotificationSpec::new(Disposition::Warn),
        &notice(),
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(job.stops(), 1);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn failing_job_with_warn_is_suppressed_and_stopped() {
    let job = FakeJob::new(Behavior::Fail);
    let notifier = FakeNotifier::new();

    let outcome = supervise(
        job.clone(),
        &TimeoutSpec::disabled(),
        &FailureNotificationSpec::new(Disposition::Warn),
        &notice(),
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::FailureSuppressed);
    assert_eq!(job.stops(), 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn failing_job_with_raise_surfaces_the_original_and_stops() {
    let job = FakeJob::new(Behavior::Fail);
    let notifier = FakeNotifier::new();

    let err = supervise(
        job.clone(),
        &TimeoutSpec::disabled(),
        &FailureNotificationSpec::new(Disposition::Raise),
        &notice(),
        &notifier,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Engine);
    assert_eq!(job.stops(), 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn hanging_job_times_out_and_is_stopped() {
    let job = FakeJob::new(Behavior::Hang);
    let notifier = FakeNotifier::new();

    let started = Instant::now();
    let outcome = supervise(
        job.clone(),
        &TimeoutSpec::new(Duration::from_millis(100), Disposition::Warn)
            .with_notice(notice()),
        &FailureNotificationSpec::new(Disposition::Warn),
        &notice(),
        &notifier,
    )
    .await
    .unwrap();

    assert_eq!(outcome, Outcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(job.stops(), 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn hanging_job_with_raise_signals_the_timeout() {
    let job = FakeJob::new(Behavior::Hang);
    let notifier = FakeNotifier::new();

    let err = supervise(
        job.clone(),
        &TimeoutSpec::new(Duration::from_millis(100), Disposition::Raise),
        &FailureNotificationSpec::new(Disposition::Skip),
        &notice(),
        &notifier,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RetryTimeout);
    assert_eq!(job.stops(), 1);
}

#[tokio::test]
async fn stop_failure_surfaces_after_a_successful_run() {
    let mut job = FakeJob::new(Behavior::Succeed);
    job.stop_error = true;
    let notifier = FakeNotifier::new();

    let err = supervise(
        job.clone(),
        &TimeoutSpec::disabled(),
        &FailureNotificationSpec::new(Disposition::Warn),
        &notice(),
        &notifier,
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProcessTermination);
}

// ---------------------------------------------------------------------------
// End-to-end runs driven by a stub engine script
// ---------------------------------------------------------------------------

fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
    let script = dir.join("engine.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

fn write_workflow(dir: &Path) -> std::path::PathBuf {
    let workflow = dir.join("daily_sales.flow");
    std::fs::write(&workflow, "workflow document").unwrap();
    workflow
}

fn config_toml(dir: &Path, script_body: &str, extra: &str) -> String {
    let workflow = write_workflow(dir);
    let script = write_script(dir, script_body);
    format!(
        r#"
path_to_executable = "{}"
engine_cmd = "{}"
mode = "TEST"
admins = ["ops@example.com"]

[log_to]
table = "flow_logs"
connection_string = "file://{}"

{extra}
"#,
        workflow.display(),
        script.display(),
        dir.join("logs").display(),
    )
}

#[tokio::test]
async fn configured_run_completes_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        load_config_str(&config_toml(dir.path(), "echo 'processing rows'", "")).unwrap();
    let notifier = FakeNotifier::new();

    let report = run_from_config(&config, &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.job, "daily_sales_TEST");

    let log = dir.path().join("logs/flow_logs.jsonl");
    let content = std::fs::read_to_string(log).unwrap();
    assert!(content.contains("processing rows"));
}

#[tokio::test]
async fn configured_timeout_stops_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let extra = r#"
[flow_execution.timeout_settings]
on_timeout = "warn"
timeout_duration = "300ms"
"#;
    let config = load_config_str(&config_toml(dir.path(), "sleep 30", extra)).unwrap();
    let notifier = FakeNotifier::new();

    let started = Instant::now();
    let report = run_from_config(&config, &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(notifier.sent().len(), 1);
    assert!(notifier.sent()[0].subject.contains("timed out"));
}

#[tokio::test]
async fn configured_failure_with_raise_notifies_and_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let extra = r#"
[flow_execution.error_handling_settings]
on_error = "raise"
"#;
    let config = load_config_str(&config_toml(
        dir.path(),
        "echo 'fatal error in module X'",
        extra,
    ))
    .unwrap();
    let notifier = FakeNotifier::new();

    let err = run_from_config(&config, &notifier).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Engine);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients, vec!["ops@example.com".to_string()]);
}

#[tokio::test]
async fn chat_channel_routing_addresses_the_channel() {
    let dir = tempfile::tempdir().unwrap();
    let extra = r#"
[flow_execution.error_handling_settings]
on_error = "warn"
channel = "ops"

[channels]
ops = "https://chat.example.com/hooks/abc"
"#;
    let config = load_config_str(&config_toml(
        dir.path(),
        "echo 'fatal error in module X'",
        extra,
    ))
    .unwrap();
    let notifier = FakeNotifier::new();

    let report = run_from_config(&config, &notifier).await.unwrap();

    assert_eq!(report.outcome, Outcome::FailureSuppressed);
    let sent = notifier.sent();
    assert_eq!(sent[0].channel.as_deref(), Some("ops"));
    assert!(sent[0].recipients.is_empty());
}

#[tokio::test]
async fn unsupported_sink_scheme_fails_before_launch() {
    let dir = tempfile::tempdir().unwrap();
    let workflow = write_workflow(dir.path());
    let config = load_config_str(&format!(
        r#"
path_to_executable = "{}"
mode = "TEST"
admins = ["ops@example.com"]

[log_to]
table = "flow_logs"
connection_string = "mssql://server/db"
"#,
        workflow.display(),
    ))
    .unwrap();
    let notifier = FakeNotifier::new();

    let err = run_from_config(&config, &notifier).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoggingConfiguration);
}

#[tokio::test]
async fn invalid_config_file_never_launches_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("launched.txt");
    let script = write_script(dir.path(), &format!("touch {}", marker.display()));
    let workflow = write_workflow(dir.path());

    // log_to.table is missing: validation must fail before any launch.
    let config_path = dir.path().join("run.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
path_to_executable = "{}"
engine_cmd = "{}"
mode = "TEST"
admins = ["ops@example.com"]

[log_to]
connection_string = "file://{}"
"#,
            workflow.display(),
            script.display(),
            dir.path().join("logs").display(),
        ),
    )
    .unwrap();

    let notifier = FakeNotifier::new();
    let err = run_config_file(&config_path, &notifier).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("log_to.table"));
    assert!(!marker.exists());
}
