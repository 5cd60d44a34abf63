// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-cluster client creation from a shared kubeconfig

use crate::error::{ProvisionError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// A client bound to one cluster, together with the API server address it talks to
#[derive(Clone)]
pub struct ClusterConnection {
    pub client: Client,
    pub server: String,
}

/// Produces a client for a named cluster.
#[allow(async_fn_in_trait)]
pub trait ClientResolver {
    async fn resolve(&self, cluster: &str) -> Result<ClusterConnection>;
}

/// Resolves clusters by selecting the context of the same name in a kubeconfig.
///
/// The kubeconfig is read again on every call.
#[derive(Debug, Clone, Default)]
pub struct KubeconfigResolver {
    path: Option<PathBuf>,
}

impl KubeconfigResolver {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn load(&self, cluster: &str) -> Result<Kubeconfig> {
        let kubeconfig = match &self.path {
            Some(path) => {
                debug!("Reading kubeconfig from {}", path.display());
                Kubeconfig::read_from(path)
            }
            None => Kubeconfig::read(),
        };
        kubeconfig.map_err(|e| ProvisionError::connection(cluster, e))
    }
}

impl ClientResolver for KubeconfigResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, cluster: &str) -> Result<ClusterConnection> {
        let kubeconfig = self.load(cluster)?;

        let options = KubeConfigOptions {
            context: Some(cluster.to_string()),
            ..Default::default()
        };
        let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| ProvisionError::connection(cluster, e))?;

        let server = server_address(&client_config.cluster_url);
        debug!("Cluster '{}' resolves to {}", cluster, server);

        let client =
            Client::try_from(client_config).map_err(|e| ProvisionError::connection(cluster, e))?;

        Ok(ClusterConnection { client, server })
    }
}

/// Render the API server URL the way kubeconfig files spell it, without a trailing slash
pub fn server_address(url: &http::Uri) -> String {
    url.to_string().trim_end_matches('/').to_string()
}
