//! Exponential backoff for Mambu calls.

use std::future::Future;
use std::time::Duration;

use loanlink_shared::RetryConfig;
use tracing::{info, warn};

use crate::error::MambuError;

/// Retry policy: `initial_delay * 2^attempt`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the retry budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `operation`.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, MambuError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, MambuError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(operation = operation_name, attempt, "Mambu call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay(attempt);
                    attempt += 1;
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Retrying Mambu call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    if attempt > 0 || err.is_retryable() {
                        warn!(operation = operation_name, attempt, error = %err, "Mambu call failed");
                    }
                    return Err(err);
                }
            }
        }
    }
}
