// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service account token secret retrieval

use crate::constants::TOKEN_KEY;
use crate::error::{ProvisionError, Result};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, ResourceExt};
use tracing::{debug, warn};

/// Fetch a token secret by name
pub async fn get_token_secret(api: &Api<Secret>, name: &str) -> Result<Secret> {
    debug!("Attempting to retrieve secret '{}'", name);
    api.get(name)
        .await
        .map_err(|source| ProvisionError::SecretFetch {
            name: name.to_string(),
            source,
        })
}

/// Extract the bearer token from a service account token secret.
///
/// A secret without a token yields an empty token.
pub fn bearer_token(secret: &Secret) -> String {
    match secret.data.as_ref().and_then(|d| d.get(TOKEN_KEY)) {
        Some(token) => String::from_utf8_lossy(&token.0).into_owned(),
        None => {
            warn!(
                "Secret '{}' has no '{}' key, using an empty token",
                secret.name_any(),
                TOKEN_KEY
            );
            String::new()
        }
    }
}
