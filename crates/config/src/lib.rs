//! sluice-config: declarative run-configuration parsing and validation
//!
//! A run configuration is a TOML document naming the workflow to execute,
//! its mode, the logging target, and optional timeout and error-handling
//! settings. Parsing produces raw types, validation collects every problem
//! at once, and loading converts the validated document into the immutable
//! [`RunConfig`] consumed by the runner. Validation failures surface before
//! any execution begins.

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{
    load_config, load_config_str, LoadError, LogTarget, RunConfig, TimeoutSettings,
};
pub use types::{RawErrorHandling, RawFlowExecution, RawLogTo, RawRunConfig, RawTimeoutSettings};
pub use validator::{validate_config, ValidatedConfig, ValidationError, ValidationErrors};
