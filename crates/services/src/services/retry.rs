//! Retrying wrapper around a [`DecklistValidator`].

use std::time::Duration;

use backon::{BackoffBuilder, Retryable};
use tracing::{error, warn};

use super::{
    normalizer::normalize,
    scrollrack::{DecklistValidator, ScrollrackError, ValidationResult},
};

/// Bounded attempts with a linearly growing pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Pause after the given 1-based attempt failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl BackoffBuilder for RetryPolicy {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            policy: self,
            completed: 0,
        }
    }
}

/// Yields `base, 2 * base, ...`, one delay per remaining retry.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    policy: RetryPolicy,
    completed: u32,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        // The last attempt is never followed by a pause.
        if self.completed + 1 >= self.policy.max_attempts {
            return None;
        }
        self.completed += 1;
        Some(self.policy.delay_after(self.completed))
    }
}

/// Normalize `raw` once and validate it, retrying transient failures.
///
/// Returns `Ok(None)` when every attempt failed transiently: the deck could not
/// be checked, which callers must not confuse with an invalid deck. A 4xx from
/// the validator is returned as `Err` straight away.
pub async fn validate_with_retry<V>(
    validator: &V,
    raw: &str,
    policy: RetryPolicy,
) -> Result<Option<ValidationResult>, ScrollrackError>
where
    V: DecklistValidator + ?Sized,
{
    if policy.max_attempts == 0 {
        return Ok(None);
    }

    let normalized = normalize(raw);

    let outcome = (|| async { validator.submit(&normalized).await })
        .retry(policy)
        .when(|e: &ScrollrackError| e.should_retry())
        .notify(|e, dur| {
            warn!(
                "Scrollrack validation failed, retrying after {:.2}s: {}",
                dur.as_secs_f64(),
                e
            )
        })
        .await;

    match outcome {
        Ok(result) => Ok(Some(result)),
        Err(e) if e.is_client_error() => Err(e),
        Err(e) => {
            error!(
                attempts = policy.max_attempts,
                error = %e,
                "Scrollrack validation failed after all attempts"
            );
            Ok(None)
        }
    }
}
