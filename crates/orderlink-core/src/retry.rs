//! Retry with exponential back-off and jitter, shared by the API clients.
//!
//! Each client decides which of its errors are transient and passes that
//! classifier to [`retry_with_backoff`]. Everything else is returned
//! immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure; `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

/// Delay before retry `attempt` (1-based), before jitter: `base × 2ⁿ⁻¹`,
/// capped at 60 s.
#[must_use]
pub fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS)
}

/// Runs `operation`, retrying while `is_retriable` holds, up to
/// `policy.max_retries` extra attempts. Each delay gets ±25 % jitter.
///
/// # Errors
///
/// Returns the first non-retriable error, or the last error once retries
/// are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    is_retriable: fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= policy.max_retries {
            return Err(err);
        }
        attempt += 1;
        let capped = backoff_delay_ms(policy.backoff_base_ms, attempt);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        tracing::warn!(
            attempt,
            max_retries = policy.max_retries,
            delay_ms,
            error = %err,
            "transient API error, retrying after back-off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
