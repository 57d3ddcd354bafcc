// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow engine supervisor.
//!
//! Owns one external workflow process: validates the target, launches the
//! engine with mode-specific arguments, classifies its output line by line
//! into the log sink, and terminates it gracefully, escalating to a forced
//! kill. The child is always reaped by a dedicated task, so termination can
//! be driven by pid from any handle while `run` consumes the streams.

use async_trait::async_trait;
use sluice_core::{
    poll, ExecError, JobControl, LogLevel, LogRecord, LogSink, Mode, PollSpec, SinkError,
    SystemClock, WORKFLOW_EXT,
};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

/// Default command used to invoke the analytics engine.
pub const DEFAULT_ENGINE_CMD: &str = "flowengine";

/// How long a graceful stop may take before escalating to a forced kill.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Liveness check interval while waiting for the process to exit.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of the supervised process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unstarted,
    Running,
    GracefullyStopped,
    ForciblyStopped,
    Failed,
}

/// Launch description for one workflow run
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Workflow document to execute
    pub workflow: PathBuf,
    /// Execution mode
    pub mode: Mode,
    /// Engine command to invoke
    pub engine_cmd: PathBuf,
    /// Grace period before a stop escalates to a forced kill
    pub stop_grace: Duration,
}

impl JobSpec {
    pub fn new(workflow: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            workflow: workflow.into(),
            mode,
            engine_cmd: PathBuf::from(DEFAULT_ENGINE_CMD),
            stop_grace: STOP_GRACE,
        }
    }

    pub fn with_engine_cmd(mut self, engine_cmd: impl Into<PathBuf>) -> Self {
        self.engine_cmd = engine_cmd.into();
        self
    }

    pub fn with_stop_grace(mut self, stop_grace: Duration) -> Self {
        self.stop_grace = stop_grace;
        self
    }

    /// Identifier used as the log record source, e.g. `daily_sales_PRODUCTION`
    pub fn job_name(&self) -> String {
        let stem = self
            .workflow
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{}_{}", stem, self.mode)
    }
}

/// State shared between `run`, `stop`, and the reaper task
struct EngineShared {
    state: Mutex<EngineState>,
    pid: Mutex<Option<u32>>,
    /// Set before any termination signal, so `run` can tell a deliberate
    /// stop from an engine crash
    stopping: AtomicBool,
}

impl EngineShared {
    fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::Unstarted),
            pid: Mutex::new(None),
            stopping: AtomicBool::new(false),
        }
    }

    fn stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    fn set_stopping(&self) {
        self.stopping.store(true, Ordering::SeqCst);
    }

    fn state(&self) -> EngineState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: EngineState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Transition only while still running, so a final state set by one
    /// side is not clobbered by the other.
    fn transition_if_running(&self, next: EngineState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == EngineState::Running {
            *state = next;
        }
    }

    fn pid(&self) -> Option<u32> {
        *self.pid.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_pid(&self, pid: Option<u32>) {
        *self.pid.lock().unwrap_or_else(|e| e.into_inner()) = pid;
    }
}

/// Supervises a single external workflow process.
pub struct WorkflowEngine<S> {
    spec: JobSpec,
    sink: S,
    shared: Arc<EngineShared>,
}

impl<S: Clone> Clone for WorkflowEngine<S> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            sink: self.sink.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: LogSink> WorkflowEngine<S> {
    pub fn new(spec: JobSpec, sink: S) -> Self {
        Self {
            spec,
            sink,
            shared: Arc::new(EngineShared::new()),
        }
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    /// Validate the target, launch the engine, and consume its output until
    /// exit.
    ///
    /// Every line of engine output is classified and forwarded to the sink.
    /// A line classified `Error` fails the run immediately; the process is
    /// then torn down through [`WorkflowEngine::stop`].
    pub async fn run(&self) -> Result<(), ExecError> {
        if self.shared.state() != EngineState::Unstarted {
            return Err(ExecError::Engine {
                message: "engine has already run".to_string(),
            });
        }

        if !self.spec.workflow.exists() {
            return Err(ExecError::ProcessNotFound {
                path: self.spec.workflow.clone(),
            });
        }
        if self.spec.workflow.extension().and_then(|e| e.to_str()) != Some(WORKFLOW_EXT) {
            return Err(ExecError::InvalidExecutable {
                path: self.spec.workflow.clone(),
            });
        }

        // The sink is consulted before anything launches.
        self.sink.ensure_ready().await?;

        let mut command = Command::new(&self.spec.engine_cmd);
        command
            .args(self.spec.mode.engine_args())
            .arg(&self.spec.workflow)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::info!(
            workflow = %self.spec.workflow.display(),
            mode = %self.spec.mode,
            engine = %self.spec.engine_cmd.display(),
            "starting workflow engine"
        );

        let mut child = command.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExecError::ProcessNotFound {
                path: self.spec.engine_cmd.clone(),
            },
            _ => ExecError::Engine {
                message: format!("failed to launch engine: {e}"),
            },
        })?;

        self.shared.set_pid(child.id());
        self.shared.set_state(EngineState::Running);

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // The reaper owns the child: the process is always waited on, even
        // if this future is abandoned by a timeout guard.
        let (exit_tx, exit_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let status = child.wait().await;
            shared.set_pid(None);
            let _ = exit_tx.send(status);
        });

        let source = self.spec.job_name();
        if let Err(e) = self.consume_streams(stdout, stderr, &source).await {
            self.shared.set_state(EngineState::Failed);
            return Err(e);
        }

        let status = match exit_rx.await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                self.shared.set_state(EngineState::Failed);
                return Err(ExecError::Engine {
                    message: format!("wait failed: {e}"),
                });
            }
            Err(_) => {
                self.shared.set_state(EngineState::Failed);
                return Err(ExecError::Engine {
                    message: "engine exit status lost".to_string(),
                });
            }
        };

        if status.success() {
            self.shared
                .transition_if_running(EngineState::GracefullyStopped);
            tracing::info!(source, "workflow completed");
            Ok(())
        } else if self.shared.stopping() {
            // stop() ended the run deliberately
            Ok(())
        } else {
            self.shared.set_state(EngineState::Failed);
            Err(ExecError::Engine {
                message: format!("engine exited with {status}"),
            })
        }
    }

    /// Stop the supervised process, escalating from a graceful termination
    /// signal to a forced kill.
    ///
    /// A stop on an unstarted or already-finished engine is a no-op. A
    /// process that survives the forced kill is fatal and surfaced as
    /// [`ExecError::ProcessTermination`]; it is never retried here.
    pub async fn stop(&self) -> Result<(), ExecError> {
        let Some(pid) = self.shared.pid() else {
            return Ok(());
        };

        tracing::info!(pid, "stopping workflow engine");
        self.shared.set_stopping();
        signal_pid(pid, false);
        if wait_for_exit(&self.shared, self.spec.stop_grace).await {
            self.shared
                .transition_if_running(EngineState::GracefullyStopped);
            self.record_stop().await;
            return Ok(());
        }

        tracing::warn!(pid, "graceful stop timed out, forcing kill");
        signal_pid(pid, true);
        if wait_for_exit(&self.shared, self.spec.stop_grace).await {
            self.shared
                .transition_if_running(EngineState::ForciblyStopped);
            self.record_stop().await;
            return Ok(());
        }

        tracing::error!(pid, "process survived forced kill");
        Err(ExecError::ProcessTermination { pid })
    }

    async fn record_stop(&self) {
        if let Err(e) = self
            .log_record("workflow engine stopped", LogLevel::Info)
            .await
        {
            tracing::warn!(error = %e, "could not record engine stop");
        }
    }

    /// Forward both output streams through classification into the sink.
    async fn consume_streams(
        &self,
        stdout: Option<impl AsyncRead + Unpin + Send + 'static>,
        stderr: Option<impl AsyncRead + Unpin + Send + 'static>,
        source: &str,
    ) -> Result<(), ExecError> {
        let (tx, mut rx) = mpsc::channel::<String>(64);

        if let Some(stdout) = stdout {
            forward_lines(stdout, tx.clone());
        }
        if let Some(stderr) = stderr {
            forward_lines(stderr, tx.clone());
        }
        drop(tx);

        while let Some(line) = rx.recv().await {
            self.forward_line(&line, source).await?;
        }
        Ok(())
    }

    async fn forward_line(&self, line: &str, source: &str) -> Result<(), ExecError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let level = classify_line(line);
        self.sink
            .append(&LogRecord::new(line, level, source))
            .await?;

        if level == LogLevel::Error {
            return Err(ExecError::Engine {
                message: format!("exit raised by engine error: {line}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<S: LogSink> JobControl for WorkflowEngine<S> {
    async fn run_job(&self) -> Result<(), ExecError> {
        self.run().await
    }

    async fn log_record(&self, message: &str, level: LogLevel) -> Result<(), SinkError> {
        self.sink
            .append(&LogRecord::new(message, level, self.spec.job_name()))
            .await
    }

    async fn stop_job(&self) -> Result<(), ExecError> {
        self.stop().await
    }
}

/// Map a raw engine output line to a severity.
///
/// An `error` token marks the line `Error` unless a `warning` token is also
/// present, which takes precedence and downgrades it to `Warning`.
pub fn classify_line(line: &str) -> LogLevel {
    let lower = line.to_lowercase();
    if lower.contains("error") {
        if lower.contains("warning") {
            LogLevel::Warning
        } else {
            LogLevel::Error
        }
    } else {
        LogLevel::Info
    }
}

/// Pump one output stream into the line channel.
fn forward_lines(stream: impl AsyncRead + Unpin + Send + 'static, tx: mpsc::Sender<String>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
}

/// Wait for the reaper to observe process exit within the grace period.
async fn wait_for_exit(shared: &Arc<EngineShared>, grace: Duration) -> bool {
    let spec = PollSpec::new(grace, STOP_POLL_INTERVAL);
    poll(
        &spec,
        &SystemClock,
        || {
            let gone = shared.pid().is_none();
            async move { Ok(gone) }
        },
        |gone: &bool| Ok(*gone),
    )
    .await
    .is_ok()
}

#[cfg(target_family = "unix")]
fn signal_pid(pid: u32, forceful: bool) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let signal = if forceful {
        Signal::SIGKILL
    } else {
        Signal::SIGTERM
    };
    if let Err(e) = kill(Pid::from_raw(pid as i32), signal) {
        tracing::debug!(pid, error = %e, "signal delivery failed");
    }
}

#[cfg(not(target_family = "unix"))]
fn signal_pid(pid: u32, _forceful: bool) {
    tracing::warn!(pid, "signal-based termination is unix-only");
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
