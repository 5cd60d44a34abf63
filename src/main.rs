// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use serviceuser::config::{Args, Config};
use serviceuser::kubernetes::KubeconfigResolver;
use serviceuser::provision::{ProvisionManager, RunOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr, stdout is reserved for the generated kubeconfig
    let default_level = if args.debug { "trace" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_args(args)?;
    info!(
        "Configuration loaded: team={}, clusters={}, mode={:?}",
        config.team,
        config.clusters.join(","),
        config.mode
    );

    let resolver = KubeconfigResolver::new(config.kubeconfig.clone());

    match ProvisionManager::new(&config, resolver).run().await? {
        RunOutcome::Revoked => {}
        RunOutcome::Generated(kubeconfig) => {
            kubeconfig.write_to(&mut tokio::io::stdout()).await?;
            info!("Configuration file successfully written to stdout");
        }
    }

    Ok(())
}
