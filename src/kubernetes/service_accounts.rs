// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service account lookup, creation and deletion

use crate::error::{is_conflict, is_not_found, ProvisionError, Result};
use k8s_openapi::api::core::v1::ServiceAccount;
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    Api,
};
use tracing::debug;

/// Fetch a service account, mapping 404 to `IdentityNotFound`
pub async fn get_service_account(api: &Api<ServiceAccount>, name: &str) -> Result<ServiceAccount> {
    debug!("Attempting to retrieve service account '{}'", name);
    api.get(name).await.map_err(|e| {
        if is_not_found(&e) {
            ProvisionError::IdentityNotFound(name.to_string())
        } else {
            ProvisionError::KubeError(e)
        }
    })
}

/// Create a service account, mapping 409 to `IdentityAlreadyExists`
pub async fn create_service_account(
    api: &Api<ServiceAccount>,
    name: &str,
    namespace: &str,
) -> Result<ServiceAccount> {
    debug!("Attempting to create service account '{}'", name);
    let service_account = ServiceAccount {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    api.create(&PostParams::default(), &service_account)
        .await
        .map_err(|e| {
            if is_conflict(&e) {
                ProvisionError::IdentityAlreadyExists(name.to_string())
            } else {
                ProvisionError::KubeError(e)
            }
        })
}

/// Delete a service account, mapping 404 to `IdentityNotFound`
pub async fn delete_service_account(api: &Api<ServiceAccount>, name: &str) -> Result<()> {
    debug!("Attempting to delete service account '{}'", name);
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(e) if is_not_found(&e) => Err(ProvisionError::IdentityNotFound(name.to_string())),
        Err(e) => Err(ProvisionError::KubeError(e)),
    }
}

/// Name of the first secret referenced by a service account
pub fn first_secret_name(service_account: &ServiceAccount) -> Option<&str> {
    service_account
        .secrets
        .as_ref()
        .and_then(|secrets| secrets.first())
        .and_then(|reference| reference.name.as_deref())
}
