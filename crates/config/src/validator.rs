// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic validation for run configurations.
//!
//! This module validates that a parsed configuration is complete and
//! coherent before anything launches:
//! - Required fields (workflow path, mode, logging target)
//! - Field shape (workflow extension, connection-string scheme)
//! - Policy consistency (admins when notifications are configured,
//!   channel references, non-zero timeout)
//!
//! All problems are collected and reported together.

use super::types::RawRunConfig;
use sluice_core::{Disposition, WORKFLOW_EXT};
use std::time::Duration;

/// Result of validation
pub type ValidationResult = Result<ValidatedConfig, ValidationErrors>;

/// A validated run configuration (same structure as the raw document)
///
/// This type is a marker that the document has passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// The underlying raw configuration
    pub raw: RawRunConfig,
}

/// Collection of validation errors
#[derive(Debug, Clone)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Run configuration validation failed with {} error(s):",
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A single validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent
    MissingRequired { field: &'static str },
    /// A required field is present but empty
    EmptyField { field: &'static str },
    /// The workflow path does not carry the workflow extension
    InvalidExtension { path: String },
    /// The connection string carries no scheme
    InvalidConnectionString { value: String },
    /// Admins are required for the configured error disposition
    AdminsRequired { on_error: Disposition },
    /// The timeout budget must be non-zero
    ZeroTimeout,
    /// The notification channel is not in the channel map
    UnknownChannel { channel: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequired { field } => {
                write!(f, "missing required field '{}'", field)
            }
            ValidationError::EmptyField { field } => {
                write!(f, "field '{}' must not be empty", field)
            }
            ValidationError::InvalidExtension { path } => {
                write!(f, "'{}' must end with '.{}'", path, WORKFLOW_EXT)
            }
            ValidationError::InvalidConnectionString { value } => {
                write!(f, "'{}' is not a valid connection string", value)
            }
            ValidationError::AdminsRequired { on_error } => {
                write!(f, "'admins' is required when on_error is {:?}", on_error)
            }
            ValidationError::ZeroTimeout => {
                write!(f, "'timeout_duration' must be greater than zero")
            }
            ValidationError::UnknownChannel { channel } => {
                write!(f, "notification channel '{}' is not in [channels]", channel)
            }
        }
    }
}

/// Validate a run configuration.
pub fn validate_config(raw: &RawRunConfig) -> ValidationResult {
    let mut errors = Vec::new();

    validate_workflow_path(raw, &mut errors);
    validate_mode(raw, &mut errors);
    validate_log_to(raw, &mut errors);
    validate_error_handling(raw, &mut errors);
    validate_timeout(raw, &mut errors);

    if errors.is_empty() {
        Ok(ValidatedConfig { raw: raw.clone() })
    } else {
        Err(ValidationErrors { errors })
    }
}

fn validate_workflow_path(raw: &RawRunConfig, errors: &mut Vec<ValidationError>) {
    match &raw.path_to_executable {
        None => errors.push(ValidationError::MissingRequired {
            field: "path_to_executable",
        }),
        Some(path) if path.is_empty() => errors.push(ValidationError::EmptyField {
            field: "path_to_executable",
        }),
        Some(path) if !path.ends_with(&format!(".{}", WORKFLOW_EXT)) => {
            errors.push(ValidationError::InvalidExtension { path: path.clone() })
        }
        Some(_) => {}
    }
}

fn validate_mode(raw: &RawRunConfig, errors: &mut Vec<ValidationError>) {
    if raw.mode.is_none() {
        errors.push(ValidationError::MissingRequired { field: "mode" });
    }
}

fn validate_log_to(raw: &RawRunConfig, errors: &mut Vec<ValidationError>) {
    let Some(log_to) = &raw.log_to else {
        errors.push(ValidationError::MissingRequired { field: "log_to" });
        return;
    };

    match &log_to.table {
        None => errors.push(ValidationError::MissingRequired {
            field: "log_to.table",
        }),
        Some(table) if table.is_empty() => errors.push(ValidationError::EmptyField {
            field: "log_to.table",
        }),
        Some(_) => {}
    }

    match &log_to.connection_string {
        None => errors.push(ValidationError::MissingRequired {
            field: "log_to.connection_string",
        }),
        Some(value) if value.is_empty() => errors.push(ValidationError::EmptyField {
            field: "log_to.connection_string",
        }),
        Some(value) if !value.contains("://") => {
            errors.push(ValidationError::InvalidConnectionString {
                value: value.clone(),
            })
        }
        Some(_) => {}
    }
}

fn validate_error_handling(raw: &RawRunConfig, errors: &mut Vec<ValidationError>) {
    let settings = raw
        .flow_execution
        .as_ref()
        .and_then(|fe| fe.error_handling_settings.as_ref());

    let on_error = settings
        .and_then(|s| s.on_error)
        .unwrap_or(Disposition::Warn);

    // Raise also notifies, so both dispositions need someone to notify
    // unless notices are routed to a chat channel instead.
    let channel = settings.and_then(|s| s.channel.as_ref());
    if matches!(on_error, Disposition::Warn | Disposition::Raise)
        && raw.admins.is_empty()
        && channel.is_none()
    {
        errors.push(ValidationError::AdminsRequired { on_error });
    }

    if let Some(channel) = channel {
        if !raw.channels.contains_key(channel) {
            errors.push(ValidationError::UnknownChannel {
                channel: channel.clone(),
            });
        }
    }
}

fn validate_timeout(raw: &RawRunConfig, errors: &mut Vec<ValidationError>) {
    let Some(settings) = raw
        .flow_execution
        .as_ref()
        .and_then(|fe| fe.timeout_settings.as_ref())
    else {
        return;
    };

    match settings.timeout_duration {
        None => errors.push(ValidationError::MissingRequired {
            field: "flow_execution.timeout_settings.timeout_duration",
        }),
        Some(duration) if duration == Duration::ZERO => {
            errors.push(ValidationError::ZeroTimeout)
        }
        Some(_) => {}
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
