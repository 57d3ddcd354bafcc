//! sluice-core: Core library for the sluice workflow supervisor
//!
//! This crate provides:
//! - The shared failure taxonomy every component signals through
//! - Execution-control primitives: retry, deadline, polling, parallel fan-out
//! - The failure-notification policy
//! - Adapter traits for external integrations (log sinks, notification transports)

pub mod clock;
pub mod error;
pub mod job;

pub mod adapters;
pub mod exec;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ErrorKind, ExecError};
pub use job::{JobControl, Mode, WORKFLOW_EXT};

// Re-export adapter contracts
pub use adapters::{LogLevel, LogRecord, LogSink, Notice, Notifier, NotifyError, SinkError};

// Re-export execution-control primitives
pub use exec::{
    notify_on_failure, poll, retry, with_timeout, Disposition, FailureNotificationSpec, Handle,
    ParallelRunner, PollSpec, RetrySpec, TimeoutSpec,
};
