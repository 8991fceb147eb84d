use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Catalog override for commands that run without a full configuration.
///
/// Loads `.env` first, like [`load_app_config`], so both paths see the same
/// `ORDERLINK_CATALOG_PATH`.
#[must_use]
pub fn load_catalog_path() -> Option<PathBuf> {
    dotenvy::dotenv().ok();
    catalog_path_from(|key| std::env::var(key))
}

/// Blank counts as unset.
fn catalog_path_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup("ORDERLINK_CATALOG_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates can leave secrets empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("ORDERLINK_ENV", "development"))?;
    let log_level = or_default("ORDERLINK_LOG_LEVEL", "info");
    let catalog_path = catalog_path_from(&lookup);

    let db_max_connections = parse_u32("ORDERLINK_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("ORDERLINK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ORDERLINK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("ORDERLINK_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("ORDERLINK_HTTP_USER_AGENT", "orderlink/0.1 (order-sync)");
    let max_retries = parse_u32("ORDERLINK_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("ORDERLINK_RETRY_BACKOFF_BASE_MS", "1000")?;

    let submit_delay_ms = parse_u64("ORDERLINK_SUBMIT_DELAY_MS", "1000")?;
    let order_lookback_hours = parse_u32("ORDERLINK_ORDER_LOOKBACK_HOURS", "24")?;
    let dispatch_batch_size = parse_u32("ORDERLINK_DISPATCH_BATCH_SIZE", "10")?;
    if dispatch_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ORDERLINK_DISPATCH_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let schedule = or_default("ORDERLINK_SCHEDULE", "0 * * * * *");

    let naver_api_base_url = or_default(
        "NAVER_API_BASE_URL",
        "https://api.commerce.naver.com/external",
    );
    let naver_client_id = optional("NAVER_CLIENT_ID");
    let naver_client_secret = optional("NAVER_CLIENT_SECRET");

    let joytel_api_base_url = or_default("JOYTEL_API_BASE_URL", "https://api.joytelshop.com");
    let joytel_customer_code = optional("JOYTEL_CUSTOMER_CODE");
    let joytel_customer_auth = optional("JOYTEL_CUSTOMER_AUTH");
    let joytel_warehouse = or_default("JOYTEL_WAREHOUSE", "");

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        catalog_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        http_user_agent,
        max_retries,
        retry_backoff_base_ms,
        submit_delay_ms,
        order_lookback_hours,
        dispatch_batch_size,
        schedule,
        naver_api_base_url,
        naver_client_id,
        naver_client_secret,
        joytel_api_base_url,
        joytel_customer_code,
        joytel_customer_auth,
        joytel_warehouse,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ORDERLINK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
