//! Application-wide error types.

use thiserror::Error;

use super::config::DeploymentTarget;

/// Failures raised while resolving an environment record.
///
/// Every variant is fatal at startup: callers are expected to refuse to run
/// rather than fall back to a partial configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration registered for target '{target}'")]
    NotFound { target: String },

    #[error("invalid configuration for '{target}': {field} {reason}")]
    Validation {
        target: DeploymentTarget,
        field: &'static str,
        reason: String,
    },

    #[error("configuration read before load")]
    NotLoaded,

    #[error("configuration already loaded for '{active}', refusing to load '{requested}'")]
    AlreadyLoaded {
        active: DeploymentTarget,
        requested: DeploymentTarget,
    },

    #[error("config source error: {0}")]
    Source(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
