// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loader: converts validated configuration documents to runtime types.
//!
//! # Example
//!
//! ```ignore
//! use sluice_config::load_config;
//!
//! let config = load_config(Path::new("daily_sales.toml"))?;
//! ```

use super::types::RawRunConfig;
use super::validator::{validate_config, ValidatedConfig, ValidationErrors};
use sluice_core::{Disposition, Mode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a run configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading the configuration file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Missing required field (validation guarantees this never fires)
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },
}

/// A validated, immutable run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Workflow document to execute
    pub workflow: PathBuf,
    /// Execution mode
    pub mode: Mode,
    /// Override for the engine command
    pub engine_cmd: Option<PathBuf>,
    /// Administrators notified on failure
    pub admins: Vec<String>,
    /// Logging target
    pub log_to: LogTarget,
    /// Optional deadline for the run
    pub timeout: Option<TimeoutSettings>,
    /// Reaction to a failed run
    pub on_error: Disposition,
    /// Chat channel for failure notices; mail is used when absent
    pub notify_channel: Option<String>,
    /// Static channel -> webhook map
    pub channels: HashMap<String, String>,
}

/// Where classified log records go
#[derive(Debug, Clone)]
pub struct LogTarget {
    pub table: String,
    pub connection_string: String,
}

/// Deadline applied to the run
#[derive(Debug, Clone)]
pub struct TimeoutSettings {
    pub on_timeout: Disposition,
    pub duration: Duration,
}

/// Load a run configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RunConfig, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_config_str(&content)
}

/// Load a run configuration from TOML content.
pub fn load_config_str(content: &str) -> Result<RunConfig, LoadError> {
    let raw: RawRunConfig = toml::from_str(content)?;
    let validated = validate_config(&raw)?;
    RunConfig::from_validated(validated)
}

impl RunConfig {
    fn from_validated(validated: ValidatedConfig) -> Result<Self, LoadError> {
        let raw = validated.raw;

        let workflow = raw.path_to_executable.ok_or(LoadError::MissingField {
            field: "path_to_executable",
        })?;
        let mode = raw.mode.ok_or(LoadError::MissingField { field: "mode" })?;
        let log_to = raw.log_to.ok_or(LoadError::MissingField { field: "log_to" })?;
        let table = log_to.table.ok_or(LoadError::MissingField {
            field: "log_to.table",
        })?;
        let connection_string = log_to.connection_string.ok_or(LoadError::MissingField {
            field: "log_to.connection_string",
        })?;

        let flow_execution = raw.flow_execution.unwrap_or_default();

        let timeout = match flow_execution.timeout_settings {
            Some(settings) => Some(TimeoutSettings {
                on_timeout: settings.on_timeout.unwrap_or(Disposition::Warn),
                duration: settings.timeout_duration.ok_or(LoadError::MissingField {
                    field: "flow_execution.timeout_settings.timeout_duration",
                })?,
            }),
            None => None,
        };

        let error_handling = flow_execution.error_handling_settings;
        let on_error = error_handling
            .as_ref()
            .and_then(|s| s.on_error)
            .unwrap_or(Disposition::Warn);
        let notify_channel = error_handling.and_then(|s| s.channel);

        Ok(Self {
            workflow: PathBuf::from(workflow),
            mode,
            engine_cmd: raw.engine_cmd.map(PathBuf::from),
            admins: raw.admins,
            log_to: LogTarget {
                table,
                connection_string,
            },
            timeout,
            on_error,
            notify_channel,
            channels: raw.channels,
        })
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
