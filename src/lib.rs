//! Typed, environment-scoped configuration for the Coffee Shop client.
//!
//! Build a [`ConfigProvider`] once at startup, [`load`](ConfigProvider::load)
//! the deployment target, and hand the provider to whatever needs the API
//! base URL or the identity provider settings.

pub mod bootstrap;
pub mod common;
pub mod provider;

pub use common::{config, error};
pub use config::{AuthConfig, DeploymentTarget, EnvironmentConfig};
pub use error::{AppError, ConfigError};
pub use provider::{ConfigProvider, ConfigProviderBuilder};
