//! Retry with exponential backoff
//!
//! Only failures whose kind is retryable (rate limiting, network trouble) are
//! retried; everything else is returned on the first attempt.

use crate::config::RetryConfig;
use crate::error::GeocodeError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff schedule for a single logical request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Random spread applied to each delay (0.0 disables)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: if config.multiplier.is_finite() {
                config.multiplier.max(1.0)
            } else {
                1.0
            },
            max_retries: config.max_retries,
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_factor: config.jitter_factor.clamp(0.0, 1.0),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-indexed)
    ///
    /// delay = initial_delay * multiplier^retry, kept within 0..=max_delay
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let max = self.max_delay.as_millis() as f64;
        let base = self.initial_delay.as_millis() as f64 * self.multiplier.powi(retry as i32);
        let capped = if base.is_finite() { base.clamp(0.0, max) } else { max };

        let spread = capped * self.jitter_factor;
        let delay = if spread > 0.0 {
            (capped + rand::thread_rng().gen_range(-spread..=spread)).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(delay as u64)
    }

    /// Total attempts this policy allows, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the retry budget is spent
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, GeocodeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeocodeError>>,
    {
        let mut retry = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!(attempts = retry + 1, "Request succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(attempts = retry + 1, error = %err, "Request failed with non-retryable error");
                return Err(err);
            }

            if retry >= self.max_retries {
                warn!(
                    attempts = retry + 1,
                    max_retries = self.max_retries,
                    error = %err,
                    "Request failed after max retries"
                );
                return Err(err);
            }

            let delay = self.delay_for_retry(retry);
            warn!(
                attempt = retry + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Request failed, retrying"
            );

            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
