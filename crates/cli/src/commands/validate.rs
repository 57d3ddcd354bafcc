// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice validate` - check a configuration without running it.

use anyhow::Result;
use clap::Args;
use sluice_config::load_config;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    match load_config(&args.config) {
        Ok(config) => {
            println!(
                "{} is valid: {} run of {}",
                args.config.display(),
                config.mode,
                config.workflow.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}
