//! Shared domain types and configuration for the machmatch workspace.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod models;
pub mod providers;
pub mod taxonomy;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use models::{Confidence, MachinerySignal, Prospect, Provider, ProviderProfile, Tier};
pub use providers::{builtin_fallback_providers, load_fallback_providers, FallbackProvidersFile};
pub use taxonomy::Taxonomy;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    FileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
