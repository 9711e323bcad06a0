// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execute-with-backoff wrapper.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use postmill_core::PostmillError;
use regex::Regex;
use tracing::warn;

/// Matches hints such as `"retryDelay": "7s"` in provider error bodies.
static RETRY_DELAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""retryDelay"\s*:\s*"(\d+(?:\.\d+)?)s""#).expect("valid retryDelay regex")
});

/// How many times to retry and how long to wait by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. `2` means three attempts in total.
    pub max_retries: u32,
    /// Linear backoff unit: retry `n` waits `base_delay * n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (1-based) after `error`.
    pub fn delay_for(&self, attempt: u32, error: &PostmillError) -> Duration {
        parse_retry_delay(&error.to_string()).unwrap_or(self.base_delay * attempt)
    }
}

/// Extract a provider-supplied `retryDelay` duration from error text.
pub fn parse_retry_delay(text: &str) -> Option<Duration> {
    let caps = RETRY_DELAY.captures(text)?;
    let secs: f64 = caps.get(1)?.as_str().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Run `operation` until it succeeds or the policy's retries are spent.
///
/// `label` names the wrapped stage in log output.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, PostmillError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PostmillError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay_for(attempt, &err);
                warn!(
                    stage = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "stage failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
