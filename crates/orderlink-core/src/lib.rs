pub mod app_config;
pub mod catalog;
pub mod config;
pub mod options;
pub mod orders;
pub mod retry;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, HttpSettings};
pub use catalog::{Catalog, PlanRule, RegionRule, Resolution};
pub use config::{load_app_config, load_app_config_from_env, load_catalog_path};
pub use options::{parse_product_option, OrderOptions};
pub use orders::{dialable_phone, digits_only, NewOrder, OrderFields};
pub use retry::{retry_with_backoff, RetryPolicy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
