//! Which Naver errors are worth another attempt under the shared
//! [`orderlink_core::retry_with_backoff`] loop.

use reqwest::StatusCode;

use crate::error::NaverError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 5xx responses and HTTP 429 (the commerce API throttles per second).
///
/// **Not retriable:**
/// - Other 4xx responses, including expired or rejected tokens.
/// - [`NaverError::ApiError`], [`NaverError::Deserialize`] and the
///   signing/configuration errors; retrying won't fix them.
pub(crate) fn is_retriable(err: &NaverError) -> bool {
    match err {
        NaverError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS)
        }
        NaverError::ApiError(_)
        | NaverError::Deserialize { .. }
        | NaverError::InvalidSecret(_)
        | NaverError::Signature(_)
        | NaverError::InvalidBaseUrl { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use orderlink_core::{retry_with_backoff, RetryPolicy};

    use super::*;

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&NaverError::ApiError("bad".to_owned())));
    }

    #[test]
    fn invalid_secret_is_not_retriable() {
        assert!(!is_retriable(&NaverError::InvalidSecret("x".to_owned())));
    }

    #[tokio::test]
    async fn connect_error_is_retriable() {
        let err = reqwest::Client::new()
            .get("http://0.0.0.0:1")
            .send()
            .await
            .unwrap_err();
        assert!(is_retriable(&NaverError::Http(err)));
    }

    #[tokio::test]
    async fn connect_errors_exhaust_the_policy() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let policy = RetryPolicy {
            max_retries: 2,
            backoff_base_ms: 0,
        };
        let result = retry_with_backoff(policy, is_retriable, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                let err = reqwest::Client::new()
                    .get("http://0.0.0.0:1")
                    .send()
                    .await
                    .unwrap_err();
                Err::<u32, _>(NaverError::Http(err))
            }
        })
        .await;
        assert!(matches!(result, Err(NaverError::Http(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 attempt + 2 retries");
    }
}
