// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sluice - supervised execution of analytics workflow runs

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{run, validate};

#[derive(Parser)]
#[command(
    name = "sluice",
    version,
    about = "Supervised execution of analytics workflow runs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more workflow configurations
    Run(run::RunArgs),
    /// Validate a workflow configuration without running it
    Validate(validate::ValidateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Validate(args) => validate::validate(args),
    }
}
