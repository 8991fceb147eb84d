use thiserror::Error;

/// Errors returned by the Naver Commerce API client.
#[derive(Debug, Error)]
pub enum NaverError {
    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 2xx but the payload reports a failure.
    #[error("Naver API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client secret is not a bcrypt salt string (`$2a$NN$<22 chars>`).
    #[error("invalid client secret: {0}")]
    InvalidSecret(String),

    #[error("signature error: {0}")]
    Signature(#[from] bcrypt::BcryptError),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
