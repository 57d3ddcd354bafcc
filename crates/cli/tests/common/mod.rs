// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI integration tests

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable stub engine script.
pub fn write_script(dir: &Path, body: &str) -> PathBuf {
    let script = dir.join("engine.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

/// Write a workflow document.
pub fn write_workflow(dir: &Path, name: &str) -> PathBuf {
    let workflow = dir.join(name);
    std::fs::write(&workflow, "workflow document").unwrap();
    workflow
}

/// Write a run configuration pointing at a stub engine.
pub fn write_config(dir: &Path, name: &str, script_body: &str, extra: &str) -> PathBuf {
    let workflow = write_workflow(dir, &format!("{name}.flow"));
    let script = write_script(dir, script_body);
    let config = dir.join(format!("{name}.toml"));
    std::fs::write(
        &config,
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
        ),
    )
    .unwrap();
    config
}
