// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-cluster reconcilers.

pub mod service_account;

pub use service_account::{ReconcileOutcome, ServiceAccountReconciler};
