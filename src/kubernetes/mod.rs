// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client resolution, service accounts, and token secrets.

pub mod client;
pub mod secrets;
pub mod service_accounts;
pub mod wait;

pub use client::{ClientResolver, ClusterConnection, KubeconfigResolver};
pub use secrets::{bearer_token, get_token_secret};
pub use service_accounts::{
    create_service_account, delete_service_account, first_secret_name, get_service_account,
};
pub use wait::{poll_until_ready, Attempt, Backoff};
