// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw configuration document types.
//!
//! These mirror the on-disk TOML shape. Every field that validation cares
//! about is optional here so a malformed document parses far enough for the
//! validator to report all problems together.

use serde::Deserialize;
use sluice_core::{Disposition, Mode};
use std::collections::HashMap;
use std::time::Duration;

/// Top-level raw run configuration as parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRunConfig {
    /// Path to the workflow document; must end in the workflow extension
    pub path_to_executable: Option<String>,
    /// Execution mode
    pub mode: Option<Mode>,
    /// Override for the engine command (defaults to the installed engine)
    pub engine_cmd: Option<String>,
    /// Administrators notified on failure
    #[serde(default)]
    pub admins: Vec<String>,
    /// Logging target
    pub log_to: Option<RawLogTo>,
    /// Optional execution policies
    pub flow_execution: Option<RawFlowExecution>,
    /// Static channel -> webhook map for the chat transport
    #[serde(default)]
    pub channels: HashMap<String, String>,
}

/// Raw logging target
#[derive(Debug, Clone, Deserialize)]
pub struct RawLogTo {
    pub table: Option<String>,
    pub connection_string: Option<String>,
}

/// Raw execution policies
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlowExecution {
    pub timeout_settings: Option<RawTimeoutSettings>,
    pub error_handling_settings: Option<RawErrorHandling>,
}

/// Raw timeout settings
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeoutSettings {
    pub on_timeout: Option<Disposition>,
    #[serde(default, with = "humantime_serde")]
    pub timeout_duration: Option<Duration>,
}

/// Raw error-handling settings
#[derive(Debug, Clone, Deserialize)]
pub struct RawErrorHandling {
    pub on_error: Option<Disposition>,
    /// Route failure notices to this chat channel instead of mail
    pub channel: Option<String>,
}
