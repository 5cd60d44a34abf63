// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Central coordinator walking the configured clusters one by one.

use crate::config::{Config, Mode};
use crate::error::{ProvisionError, Result};
use crate::kubernetes::ClientResolver;
use crate::reconcilers::{ReconcileOutcome, ServiceAccountReconciler};
use crate::types::kubeconfig::{Kubeconfig, KubeconfigBuilder};
use tracing::{error, info, instrument};

/// Result of one cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterResult {
    Revoked,
    Credentials { server: String, token: String },
}

/// Result of a complete run over all clusters
#[derive(Debug)]
pub enum RunOutcome {
    /// Access was revoked everywhere; there is nothing to print
    Revoked,
    /// A kubeconfig with one context per cluster
    Generated(Kubeconfig),
}

pub struct ProvisionManager<'a, R> {
    config: &'a Config,
    resolver: R,
}

impl<'a, R: ClientResolver> ProvisionManager<'a, R> {
    pub fn new(config: &'a Config, resolver: R) -> Self {
        Self { config, resolver }
    }

    /// Reconcile every configured cluster in order.
    ///
    /// A failing cluster does not stop the remaining ones, but any failure fails
    /// the whole run and nothing is generated.
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut builder = KubeconfigBuilder::new();
        let mut failed = Vec::new();

        for cluster in &self.config.clusters {
            info!("Entering cluster '{}'", cluster);

            match self.reconcile_cluster(cluster).await {
                Ok(ClusterResult::Revoked) => {}
                Ok(ClusterResult::Credentials { server, token }) => {
                    builder.add_cluster(cluster, &server, &token);
                    info!("Successfully generated configuration for cluster '{}'", cluster);
                }
                Err(e) => {
                    error!("Failed to reconcile cluster '{}': {}", cluster, e);
                    failed.push(cluster.clone());
                }
            }
        }

        if !failed.is_empty() {
            return Err(ProvisionError::ClustersFailed(failed));
        }

        if self.config.mode == Mode::Revoke {
            info!("Successfully revoked keys");
            return Ok(RunOutcome::Revoked);
        }

        Ok(RunOutcome::Generated(builder.build(self.config.default_context())))
    }

    #[instrument(skip(self))]
    async fn reconcile_cluster(&self, cluster: &str) -> Result<ClusterResult> {
        let connection = self.resolver.resolve(cluster).await?;

        let outcome = ServiceAccountReconciler::new(connection.client, self.config)
            .reconcile()
            .await?;

        Ok(match outcome {
            ReconcileOutcome::Revoked => ClusterResult::Revoked,
            ReconcileOutcome::Token(token) => ClusterResult::Credentials {
                server: connection.server,
                token,
            },
        })
    }
}
