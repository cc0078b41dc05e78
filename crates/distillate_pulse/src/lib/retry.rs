//! Bounded exponential backoff for calls to external services.
//!
//! The policy is a plain value handed to each call site, so backoff behavior
//! is testable in isolation against the runtime's paused clock.

use std::{future::Future, time::Duration};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy for page, feed and transcript retrieval.
    pub fn fetch() -> Self {
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Policy for language-model calls, which rate-limit far more
    /// aggressively than plain page fetches.
    pub fn language_model() -> Self {
        RetryPolicy {
            max_attempts: 6,
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(65),
        }
    }

    /// Delay to sleep after the given failed attempt (1-based). Doubles from
    /// `base_delay` and is clamped to `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << (attempt.saturating_sub(1)).min(16))
            .min(self.max_delay)
    }
}

/// Runs `op` until it succeeds or the policy's attempts are exhausted,
/// sleeping the backoff schedule between attempts. Returns the final error
/// on exhaustion.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    E: std::fmt::Debug,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    error = ?err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
