//! Which submission failures are retried.
//!
//! Only failures where the order certainly did not reach JoyTel are retried:
//! connection errors, 5xx and 429. A timeout is returned as-is since the
//! order may already have been accepted under the same `orderTid`.

use reqwest::StatusCode;

use crate::error::JoytelError;

pub(crate) fn is_retriable(err: &JoytelError) -> bool {
    match err {
        JoytelError::Http(e) => {
            e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS)
        }
        JoytelError::ApiError { .. }
        | JoytelError::Deserialize { .. }
        | JoytelError::InvalidOrder(_)
        | JoytelError::InvalidBaseUrl { .. } => false,
    }
}
