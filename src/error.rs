// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to resolve connection for cluster '{cluster}': {message}")]
    ConnectionConfig { cluster: String, message: String },

    #[error("Service account '{0}' not found")]
    IdentityNotFound(String),

    #[error("Service account '{0}' already exists")]
    IdentityAlreadyExists(String),

    #[error("No secret associated with service account '{0}'")]
    NoSecret(String),

    #[error("Failed to retrieve secret '{name}': {source}")]
    SecretFetch {
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error("Invalid arguments: {0}")]
    Validation(String),

    #[error("While generating output: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("While writing output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Reconciliation failed for clusters: {}", .0.join(", "))]
    ClustersFailed(Vec<String>),
}

impl ProvisionError {
    pub fn connection(cluster: &str, message: impl std::fmt::Display) -> Self {
        ProvisionError::ConnectionConfig {
            cluster: cluster.to_string(),
            message: message.to_string(),
        }
    }
}

/// True when the API server answered with the given HTTP status code
pub fn is_api_status(err: &kube::Error, code: u16) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == code)
}

pub fn is_not_found(err: &kube::Error) -> bool {
    is_api_status(err, 404)
}

pub fn is_conflict(err: &kube::Error) -> bool {
    is_api_status(err, 409)
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
