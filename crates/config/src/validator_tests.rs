// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for run-configuration validation

use super::*;
use crate::types::{RawErrorHandling, RawFlowExecution, RawLogTo, RawTimeoutSettings};
use sluice_core::Mode;

fn valid_raw() -> RawRunConfig {
    RawRunConfig {
        path_to_executable: Some("flows/daily_sales.flow".to_string()),
        mode: Some(Mode::Production),
        engine_cmd: None,
        admins: vec!["ops@example.com".to_string()],
        log_to: Some(RawLogTo {
            table: Some("analytics.flow_logs".to_string()),
            connection_string: Some("file:///var/log/sluice".to_string()),
        }),
        flow_execution: None,
        channels: Default::default(),
    }
}

#[test]
fn valid_config_passes() {
    assert!(validate_config(&valid_raw()).is_ok());
}

#[test]
fn missing_workflow_path_is_reported() {
    let mut raw = valid_raw();
    raw.path_to_executable = None;

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::MissingRequired {
        field: "path_to_executable"
    }));
}

#[test]
fn wrong_extension_is_reported() {
    let mut raw = valid_raw();
    raw.path_to_executable = Some("flows/daily_sales.txt".to_string());

    let errors = validate_config(&raw).unwrap_err();
    assert!(matches!(
        errors.errors[0],
        ValidationError::InvalidExtension { .. }
    ));
}

#[test]
fn missing_mode_is_reported() {
    let mut raw = valid_raw();
    raw.mode = None;

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors
        .errors
        .contains(&ValidationError::MissingRequired { field: "mode" }));
}

#[test]
fn missing_log_table_is_reported() {
    let mut raw = valid_raw();
    raw.log_to = Some(RawLogTo {
        table: None,
        connection_string: Some("file:///var/log/sluice".to_string()),
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::MissingRequired {
        field: "log_to.table"
    }));
}

#[test]
fn connection_string_without_scheme_is_reported() {
    let mut raw = valid_raw();
    raw.log_to = Some(RawLogTo {
        table: Some("analytics.flow_logs".to_string()),
        connection_string: Some("just-a-path".to_string()),
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(matches!(
        errors.errors[0],
        ValidationError::InvalidConnectionString { .. }
    ));
}

#[test]
fn warn_without_admins_requires_admins() {
    let mut raw = valid_raw();
    raw.admins.clear();

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::AdminsRequired {
        on_error: Disposition::Warn
    }));
}

#[test]
fn raise_without_admins_requires_admins() {
    let mut raw = valid_raw();
    raw.admins.clear();
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: None,
        error_handling_settings: Some(RawErrorHandling {
            on_error: Some(Disposition::Raise),
            channel: None,
        }),
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::AdminsRequired {
        on_error: Disposition::Raise
    }));
}

#[test]
fn skip_does_not_require_admins() {
    let mut raw = valid_raw();
    raw.admins.clear();
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: None,
        error_handling_settings: Some(RawErrorHandling {
            on_error: Some(Disposition::Skip),
            channel: None,
        }),
    });

    assert!(validate_config(&raw).is_ok());
}

#[test]
fn chat_channel_stands_in_for_admins() {
    let mut raw = valid_raw();
    raw.admins.clear();
    raw.channels
        .insert("ops".to_string(), "https://chat.example.com/hooks/a".to_string());
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: None,
        error_handling_settings: Some(RawErrorHandling {
            on_error: Some(Disposition::Warn),
            channel: Some("ops".to_string()),
        }),
    });

    assert!(validate_config(&raw).is_ok());
}

#[test]
fn unknown_channel_is_reported() {
    let mut raw = valid_raw();
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: None,
        error_handling_settings: Some(RawErrorHandling {
            on_error: Some(Disposition::Warn),
            channel: Some("missing".to_string()),
        }),
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::UnknownChannel {
        channel: "missing".to_string()
    }));
}

#[test]
fn zero_timeout_is_reported() {
    let mut raw = valid_raw();
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: Some(RawTimeoutSettings {
            on_timeout: Some(Disposition::Warn),
            timeout_duration: Some(Duration::ZERO),
        }),
        error_handling_settings: None,
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::ZeroTimeout));
}

#[test]
fn timeout_settings_without_duration_are_reported() {
    let mut raw = valid_raw();
    raw.flow_execution = Some(RawFlowExecution {
        timeout_settings: Some(RawTimeoutSettings {
            on_timeout: Some(Disposition::Raise),
            timeout_duration: None,
        }),
        error_handling_settings: None,
    });

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.contains(&ValidationError::MissingRequired {
        field: "flow_execution.timeout_settings.timeout_duration"
    }));
}

#[test]
fn all_problems_are_collected_together() {
    let raw = RawRunConfig::default();

    let errors = validate_config(&raw).unwrap_err();
    assert!(errors.errors.len() >= 3);

    let display = errors.to_string();
    assert!(display.contains("error(s)"));
    assert!(display.contains("  2: "));
}
