// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Merged kubeconfig document handed to a team, one context per cluster.

use crate::constants::{kubeconfig, NAMESPACE};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Kubeconfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub clusters: Vec<NamedCluster>,
    pub users: Vec<NamedUser>,
    pub contexts: Vec<NamedContext>,
    pub current_context: String,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: ClusterEntry,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterEntry {
    pub server: String,
    pub insecure_skip_tls_verify: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NamedUser {
    pub name: String,
    pub user: UserEntry,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserEntry {
    pub token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextEntry,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContextEntry {
    pub cluster: String,
    pub user: String,
    pub namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Preferences {}

impl Kubeconfig {
    /// Names of all contexts, in insertion order
    #[cfg(test)]
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Bearer token stored for a cluster
    #[cfg(test)]
    pub fn token_for(&self, cluster: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.name == cluster)
            .map(|u| u.user.token.as_str())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serialize and write the document in one go
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> Result<()> {
        let output = self.to_yaml()?;
        writer.write_all(output.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Accumulates one cluster, user and context entry per successfully reconciled cluster
#[derive(Debug, Default)]
pub struct KubeconfigBuilder {
    clusters: Vec<NamedCluster>,
    users: Vec<NamedUser>,
    contexts: Vec<NamedContext>,
}

impl KubeconfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the entries for a cluster. Cluster, user and context all share the cluster name.
    pub fn add_cluster(&mut self, name: &str, server: &str, token: &str) {
        self.clusters.push(NamedCluster {
            name: name.to_string(),
            cluster: ClusterEntry {
                server: server.to_string(),
                insecure_skip_tls_verify: true,
            },
        });
        self.users.push(NamedUser {
            name: name.to_string(),
            user: UserEntry {
                token: token.to_string(),
            },
        });
        self.contexts.push(NamedContext {
            name: name.to_string(),
            context: ContextEntry {
                cluster: name.to_string(),
                user: name.to_string(),
                namespace: NAMESPACE.to_string(),
            },
        });
    }

    pub fn build(self, current_context: &str) -> Kubeconfig {
        Kubeconfig {
            api_version: kubeconfig::API_VERSION.to_string(),
            kind: kubeconfig::KIND.to_string(),
            clusters: self.clusters,
            users: self.users,
            contexts: self.contexts,
            current_context: current_context.to_string(),
            preferences: Preferences::default(),
        }
    }
}
