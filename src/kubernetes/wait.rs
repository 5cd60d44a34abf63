// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded polling with exponential backoff

use crate::error::{ProvisionError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Result of one polling attempt
pub enum Attempt<T> {
    /// The resource is ready
    Ready(T),
    /// Not ready yet; the error is returned if the deadline passes
    Retry(ProvisionError),
}

/// Backoff schedule for `poll_until_ready`
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    pub timeout: Duration,
    pub interval: Duration,
    pub max_interval: Duration,
}

impl Backoff {
    /// A single attempt without any retry
    pub fn once() -> Self {
        Self {
            timeout: Duration::ZERO,
            interval: Duration::ZERO,
            max_interval: Duration::ZERO,
        }
    }
}

/// Call `check` until it reports ready, a hard error occurs, or the timeout elapses.
/// The interval doubles after every retry up to `max_interval`.
pub async fn poll_until_ready<T, F, Fut>(
    backoff: Backoff,
    description: &str,
    mut check: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>>>,
{
    let start = Instant::now();
    let mut interval = backoff.interval;

    loop {
        match check().await? {
            Attempt::Ready(value) => return Ok(value),
            Attempt::Retry(err) => {
                if start.elapsed() + interval >= backoff.timeout {
                    return Err(err);
                }
                debug!("{} not ready ({}), retrying in {:?}", description, err, interval);
                sleep(interval).await;
                interval = (interval * 2).min(backoff.max_interval);
            }
        }
    }
}
