// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs: end-to-end supervised runs

use crate::prelude::{scenario, sluice};
use predicates::prelude::*;

#[test]
fn production_run_completes_and_logs_classified_lines() {
    let temp = tempfile::tempdir().unwrap();
    let config = scenario(
        temp.path(),
        "echo 'starting up'\necho 'warning: minor error detected'",
        "",
    );

    sluice()
        .args(["run", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"))
        .stdout(predicate::str::contains("report_PRODUCTION"));

    let content =
        std::fs::read_to_string(temp.path().join("logs/flow_logs.jsonl")).unwrap();
    assert!(content.contains("\"WARNING\""));
    assert!(content.contains("starting up"));
}

#[test]
fn validate_rejects_a_config_without_a_logging_target() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(
        &config,
        "path_to_executable = \"report.flow\"\nmode = \"TEST\"\nadmins = [\"ops@example.com\"]\n",
    )
    .unwrap();

    sluice()
        .args(["validate", config.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("log_to"));
}

#[test]
fn engine_error_lines_fail_a_raise_run() {
    let temp = tempfile::tempdir().unwrap();
    let extra = r#"
[flow_execution.error_handling_settings]
on_error = "raise"
channel = "ops"

[channels]
ops = "http://127.0.0.1:1/hook"
"#;
    let config = scenario(temp.path(), "echo 'fatal error in module X'", extra);

    sluice()
        .args(["run", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("engine failure"));
}
