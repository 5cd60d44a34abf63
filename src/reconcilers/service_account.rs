// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service account reconciler - drives a team's service account to the requested state
//! in one cluster and reads back its bearer token.

use crate::config::{Config, Mode};
use crate::constants::{propagation, NAMESPACE};
use crate::error::{ProvisionError, Result};
use crate::kubernetes::{
    bearer_token, create_service_account, delete_service_account, first_secret_name,
    get_service_account, get_token_secret, poll_until_ready, Attempt, Backoff,
};
use k8s_openapi::api::core::v1::{Secret, ServiceAccount};
use kube::{Api, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Outcome of reconciling one cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The service account is gone; nothing to put in the kubeconfig
    Revoked,
    /// The bearer token of the service account
    Token(String),
}

pub struct ServiceAccountReconciler {
    service_accounts: Api<ServiceAccount>,
    secrets: Api<Secret>,
    name: String,
    mode: Mode,
    propagation_delay: Duration,
    backoff: Backoff,
}

impl ServiceAccountReconciler {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            service_accounts: Api::namespaced(client.clone(), NAMESPACE),
            secrets: Api::namespaced(client, NAMESPACE),
            name: config.service_account_name(),
            mode: config.mode,
            propagation_delay: config.propagation_delay,
            backoff: Backoff {
                timeout: config.propagation_timeout,
                interval: Duration::from_millis(propagation::POLL_INTERVAL_MILLIS),
                max_interval: Duration::from_millis(propagation::POLL_MAX_INTERVAL_MILLIS),
            },
        }
    }

    pub async fn reconcile(&self) -> Result<ReconcileOutcome> {
        // if revoking access or rotating keys, delete the service account if it exists
        let mut deleted = false;
        if self.mode.deletes() {
            deleted = self.delete().await?;
            if self.mode == Mode::Revoke {
                if deleted {
                    info!("Revoked access for service account '{}'", self.name);
                }
                return Ok(ReconcileOutcome::Revoked);
            }
        }

        let backoff = if self.mode.creates() {
            self.create(deleted).await?;
            sleep(self.propagation_delay).await;
            self.backoff
        } else {
            Backoff::once()
        };

        let secret_name =
            poll_until_ready(backoff, "token secret", move || self.secret_reference()).await?;

        let secret = get_token_secret(&self.secrets, &secret_name).await?;
        Ok(ReconcileOutcome::Token(bearer_token(&secret)))
    }

    /// Delete the service account, returning whether it existed
    async fn delete(&self) -> Result<bool> {
        match delete_service_account(&self.service_accounts, &self.name).await {
            Ok(()) => Ok(true),
            Err(ProvisionError::IdentityNotFound(_)) => {
                debug!("Service account '{}' not found", self.name);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Create the service account. An account that still exists right after
    /// `deleted` is reported as an error, since it would carry the old token.
    async fn create(&self, deleted: bool) -> Result<()> {
        match create_service_account(&self.service_accounts, &self.name, NAMESPACE).await {
            Ok(_) => {
                if self.mode == Mode::Rotate {
                    info!("Rotated token for service account '{}'", self.name);
                } else {
                    info!("Created service account '{}'", self.name);
                }
                Ok(())
            }
            Err(e @ ProvisionError::IdentityAlreadyExists(_)) if deleted => Err(e),
            Err(ProvisionError::IdentityAlreadyExists(_)) => {
                info!("Service account '{}' already exists", self.name);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Name of the token secret once the service account references one
    async fn secret_reference(&self) -> Result<Attempt<String>> {
        match get_service_account(&self.service_accounts, &self.name).await {
            Ok(service_account) => Ok(match first_secret_name(&service_account) {
                Some(secret_name) => Attempt::Ready(secret_name.to_string()),
                None => Attempt::Retry(ProvisionError::NoSecret(self.name.clone())),
            }),
            Err(e @ ProvisionError::IdentityNotFound(_)) => Ok(Attempt::Retry(e)),
            Err(e) => Err(e),
        }
    }
}
