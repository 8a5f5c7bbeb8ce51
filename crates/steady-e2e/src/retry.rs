// Retry - Bounded re-invocation of fallible async operations
//
// Attempts are numbered from 0. After a failed attempt i (when another
// attempt remains) the engine sleeps base_delay * factor^i, or base_delay for
// fixed backoff. The last failure is returned unchanged; nothing is swallowed
// and no generic error is synthesized.

use crate::error::{Error, Result};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Growth strategy of the inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    None,
    /// Delay multiplied by `factor` after each failure
    Exponential { factor: u32 },
}

/// How often and how patiently to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: Backoff,
}

impl RetryPolicy {
    /// Fixed delay between attempts. `max_attempts` is clamped to at least 1.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: delay,
            backoff: Backoff::None,
        }
    }

    /// Doubling delay between attempts. `max_attempts` is clamped to at least 1.
    pub fn exponential(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff: Backoff::Exponential { factor: 2 },
        }
    }

    /// A single attempt, no retry.
    pub fn once() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Sleep after failed attempt `attempt` (0-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::None => self.base_delay,
            Backoff::Exponential { factor } => self
                .base_delay
                .saturating_mul(factor.saturating_pow(attempt)),
        }
    }

    /// Total sleep if every attempt fails.
    pub fn worst_case_delay(&self) -> Duration {
        (0..self.max_attempts - 1)
            .map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_secs(1))
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are spent.
///
/// Any error counts as retryable. On exhaustion the error of the final
/// attempt is returned as-is.
///
/// # Example
///
/// ```ignore
/// let policy = RetryPolicy::exponential(3, Duration::from_millis(100));
/// let title = retry(&policy, || page.title()).await?;
/// ```
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt + 1 >= policy.max_attempts => {
                tracing::debug!(attempts = attempt + 1, %error, "retry budget spent");
                return Err(error);
            }
            Err(error) => {
                let delay = policy.delay_after(attempt);
                tracing::debug!(attempt, ?delay, %error, "attempt failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Like [`retry`], but wraps the final failure in `RetryExhausted` when the
/// policy allowed more than one attempt.
pub async fn retry_exhausted<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry(policy, operation).await.map_err(|error| {
        if policy.max_attempts > 1 {
            Error::RetryExhausted {
                attempts: policy.max_attempts,
                source: Box::new(error),
            }
        } else {
            error
        }
    })
}
