// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Namespace holding every team service account
pub const NAMESPACE: &str = "default";

/// Prefix of the service account name, followed by the team name
pub const SERVICE_USER_PREFIX: &str = "serviceuser-";

/// Key of the bearer token inside a service account token secret
pub const TOKEN_KEY: &str = "token";

/// Clusters used when `--clusters` is not given
pub const DEFAULT_CLUSTERS: [&str; 4] = ["preprod-fss", "preprod-sbs", "prod-fss", "prod-sbs"];

/// Token propagation configuration
pub mod propagation {
    /// Time to wait after creating a service account before reading it back
    pub const DELAY_MILLIS: u64 = 100;
    /// Give up waiting for a token secret after this many seconds
    pub const TIMEOUT_SECS: u64 = 10;
    /// Initial polling interval in milliseconds
    pub const POLL_INTERVAL_MILLIS: u64 = 100;
    /// Maximum polling interval in milliseconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_MILLIS: u64 = 1000;
}

/// Values written into the generated kubeconfig
pub mod kubeconfig {
    pub const API_VERSION: &str = "v1";
    pub const KIND: &str = "Config";
}
