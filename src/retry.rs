//! Bounded exponential-backoff retry around a single fallible operation.

use crate::error::ScraperError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Final outcome of a retried operation and how many attempts it took.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, ScraperError>,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Wait after the `failed_attempt`-th failure (1-based): base, 2x base, 4x base, ... capped.
    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, or
    /// `max_attempts` is exhausted.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Attempted<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(attempts = attempt, "Operation succeeded after retry");
                    }
                    return Attempted {
                        result: Ok(value),
                        attempts: attempt,
                    };
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        tracing::error!(
                            error = %e,
                            attempts = attempt,
                            "Operation failed after all retry attempts exhausted"
                        );
                    } else {
                        tracing::error!(error = %e, "Operation failed with non-retryable error");
                    }
                    return Attempted {
                        result: Err(e),
                        attempts: attempt,
                    };
                }
            }
        }
    }
}
