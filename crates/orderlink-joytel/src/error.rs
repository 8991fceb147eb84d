use thiserror::Error;

/// Errors returned by the JoyTel customer-order client.
#[derive(Debug, Error)]
pub enum JoytelError {
    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 2xx with a non-zero result code.
    #[error("JoyTel API error (code {code}): {message}")]
    ApiError { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
