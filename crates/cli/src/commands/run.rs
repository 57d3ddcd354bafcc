// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sluice run` - execute one or more workflow configurations.

use anyhow::{bail, Context, Result};
use clap::Args;
use sluice_adapters::{SendmailNotifier, WebhookNotifier};
use sluice_config::{load_config, RunConfig};
use sluice_core::{ExecError, Notifier, ParallelRunner};
use sluice_engine::{run_from_config, RunReport};
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Configuration files to run
    #[arg(required = true)]
    pub configs: Vec<PathBuf>,

    /// Maximum concurrent runs when several configs are given
    #[arg(long, default_value_t = 4)]
    pub max_workers: usize,
}

pub async fn run(args: RunArgs) -> Result<()> {
    // Load every config up front: an invalid document fails the whole
    // invocation before any run starts.
    let mut jobs = Vec::with_capacity(args.configs.len());
    for path in &args.configs {
        let config = load_config(path)
            .with_context(|| format!("loading {}", path.display()))?;
        jobs.push(config);
    }

    tracing::info!(
        configs = args.configs.len(),
        max_workers = args.max_workers,
        "starting supervised runs"
    );
    let runner = ParallelRunner::new(args.max_workers);
    let results = runner
        .run(jobs, |config| async move { dispatch(config).await })
        .await;

    let mut failed = false;
    for (path, result) in args.configs.iter().zip(results) {
        match result {
            Ok(report) => println!("{}: {} ({})", path.display(), report.outcome, report.job),
            Err(e) => {
                failed = true;
                eprintln!("{}: failed: {e}", path.display());
            }
        }
    }

    if failed {
        bail!("one or more runs failed");
    }
    Ok(())
}

/// Run one config with the transport its error-handling settings select.
async fn dispatch(config: RunConfig) -> Result<RunReport, ExecError> {
    match &config.notify_channel {
        Some(_) => {
            let notifier = WebhookNotifier::new(config.channels.clone());
            run_one(&config, notifier).await
        }
        None => run_one(&config, SendmailNotifier::new()).await,
    }
}

async fn run_one<N: Notifier>(config: &RunConfig, notifier: N) -> Result<RunReport, ExecError> {
    run_from_config(config, &notifier).await
}
