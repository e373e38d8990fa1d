//! Shared configuration for the RankGrid workspace.
//!
//! Exposes [`AppConfig`], loaded from `RANKGRID_*` environment variables,
//! and the [`ConfigError`] taxonomy. Everything else in the workspace takes
//! its tunables (timeouts, concurrency, cache sizing) from here.

pub mod app_config;
pub mod config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
