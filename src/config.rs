// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{propagation, DEFAULT_CLUSTERS, SERVICE_USER_PREFIX};
use crate::error::{ProvisionError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "serviceuser")]
#[command(
    about = "Provision team service accounts across clusters and print a merged kubeconfig",
    long_about = None
)]
pub struct Args {
    /// Team name that will own the configuration file.
    #[arg(long, required = true)]
    pub team: String,

    /// Which clusters to operate on.
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_CLUSTERS)]
    pub clusters: Vec<String>,

    /// Create teams that do not exist.
    #[arg(long)]
    pub create: bool,

    /// Rotate secret tokens that are already present in cluster. This will invalidate old tokens.
    #[arg(long)]
    pub rotate: bool,

    /// Delete any tokens that belongs to this team.
    #[arg(long)]
    pub revoke: bool,

    /// Print debugging information.
    #[arg(long)]
    pub debug: bool,

    /// Kubeconfig holding one context per cluster. Defaults to $KUBECONFIG, then ~/.kube/config.
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Time to wait after creating a service account before reading its token.
    #[arg(long, default_value_t = propagation::DELAY_MILLIS)]
    pub propagation_delay_ms: u64,

    /// Give up waiting for a freshly created token after this many seconds.
    #[arg(long, default_value_t = propagation::TIMEOUT_SECS)]
    pub propagation_timeout_secs: u64,
}

/// What to do with the team service account in every cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fetch the token of an existing service account
    Read,
    /// Create the service account when missing, then fetch its token
    Create,
    /// Delete and recreate the service account, invalidating the old token
    Rotate,
    /// Delete the service account
    Revoke,
}

impl Mode {
    pub fn deletes(self) -> bool {
        matches!(self, Mode::Rotate | Mode::Revoke)
    }

    pub fn creates(self) -> bool {
        matches!(self, Mode::Rotate | Mode::Create)
    }
}

/// Validated configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub team: String,
    pub clusters: Vec<String>,
    pub mode: Mode,
    /// Explicit kubeconfig path; `None` lets kube read $KUBECONFIG or the default location
    pub kubeconfig: Option<PathBuf>,
    pub propagation_delay: Duration,
    pub propagation_timeout: Duration,
}

impl Config {
    /// Validate the parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        if args.team.is_empty() {
            return Err(ProvisionError::Validation(
                "team name must be specified".to_string(),
            ));
        }

        if args.revoke && (args.create || args.rotate) {
            return Err(ProvisionError::Validation(
                "--revoke is mutually exclusive with --create and --rotate".to_string(),
            ));
        }

        if args.clusters.is_empty() || args.clusters.iter().any(|c| c.is_empty()) {
            return Err(ProvisionError::Validation(
                "at least one non-empty cluster name must be given".to_string(),
            ));
        }

        let mode = if args.revoke {
            Mode::Revoke
        } else if args.rotate {
            Mode::Rotate
        } else if args.create {
            Mode::Create
        } else {
            Mode::Read
        };

        Ok(Config {
            team: args.team,
            clusters: args.clusters,
            mode,
            kubeconfig: args.kubeconfig,
            propagation_delay: Duration::from_millis(args.propagation_delay_ms),
            propagation_timeout: Duration::from_secs(args.propagation_timeout_secs),
        })
    }

    /// Name of the team's service account, `serviceuser-<team>`
    pub fn service_account_name(&self) -> String {
        format!("{}{}", SERVICE_USER_PREFIX, self.team)
    }

    /// The cluster that becomes the current context of the generated kubeconfig
    pub fn default_context(&self) -> &str {
        &self.clusters[0]
    }
}
