// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for CLI behavioral specs

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub fn sluice() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("sluice").unwrap()
}

/// Stub engine, workflow document, and run configuration in one directory.
pub fn scenario(dir: &Path, script_body: &str, extra: &str) -> PathBuf {
    let workflow = dir.join("report.flow");
    std::fs::write(&workflow, "workflow document").unwrap();

    let script = dir.join("engine.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{script_body}\n")).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();

    let config = dir.join("report.toml");
    std::fs::write(
        &config,
        format!(
            r#"
path_to_executable = "{}"
engine_cmd = "{}"
mode = "PRODUCTION"
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
