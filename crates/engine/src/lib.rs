//! sluice-engine: workflow process supervision and the config-driven runner
//!
//! [`WorkflowEngine`] owns the lifecycle of one external workflow process:
//! launch, line-by-line log classification into a sink, and graceful-then-
//! forceful termination. [`runner::run_from_config`] composes an engine with
//! the timeout guard and failure-notification policy described by a
//! validated run configuration.

pub mod engine;
pub mod runner;

pub use engine::{classify_line, EngineState, JobSpec, WorkflowEngine, DEFAULT_ENGINE_CMD};
pub use runner::{run_config_file, run_from_config, supervise, Outcome, RunReport};
