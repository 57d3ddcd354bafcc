// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs: command-line surface

use crate::prelude::sluice;
use predicates::prelude::*;

#[test]
fn help_lists_the_subcommands() {
    sluice()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_is_reported() {
    sluice()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sluice"));
}

#[test]
fn unknown_subcommand_fails() {
    sluice().arg("conjure").assert().failure();
}

#[test]
fn run_requires_a_config() {
    sluice().arg("run").assert().failure();
}
