use std::path::PathBuf;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Overrides the catalog compiled into the binary when set.
    pub catalog_path: Option<PathBuf>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Pause between two fulfillment submissions.
    pub submit_delay_ms: u64,
    pub order_lookback_hours: u32,
    pub dispatch_batch_size: u32,
    /// Six-field cron expression used by `watch`.
    pub schedule: String,
    pub naver_api_base_url: String,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub joytel_api_base_url: String,
    pub joytel_customer_code: Option<String>,
    pub joytel_customer_auth: Option<String>,
    pub joytel_warehouse: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("submit_delay_ms", &self.submit_delay_ms)
            .field("order_lookback_hours", &self.order_lookback_hours)
            .field("dispatch_batch_size", &self.dispatch_batch_size)
            .field("schedule", &self.schedule)
            .field("naver_api_base_url", &self.naver_api_base_url)
            .field("naver_client_id", &self.naver_client_id)
            .field(
                "naver_client_secret",
                &self.naver_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("joytel_api_base_url", &self.joytel_api_base_url)
            .field("joytel_customer_code", &self.joytel_customer_code)
            .field(
                "joytel_customer_auth",
                &self.joytel_customer_auth.as_ref().map(|_| "[redacted]"),
            )
            .field("joytel_warehouse", &self.joytel_warehouse)
            .finish()
    }
}

/// Timeout, user agent and retry policy shared by the outbound API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure; `0` disables retries.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "orderlink/0.1 (order-sync)".to_string(),
            max_retries: 3,
            retry_backoff_base_ms: 1000,
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base_ms: self.retry_backoff_base_ms,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout_secs: self.http_timeout_secs,
            user_agent: self.http_user_agent.clone(),
            max_retries: self.max_retries,
            retry_backoff_base_ms: self.retry_backoff_base_ms,
        }
    }
}
