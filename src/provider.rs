//! The configuration provider.
//!
//! A [`ConfigProvider`] owns the registry of per-target records and, once
//! [`load`](ConfigProvider::load) succeeds, exactly one active
//! [`EnvironmentConfig`]. Build one at startup and pass it by reference;
//! there is no process-wide instance.
//!
//! ```text
//! Unloaded ──load(target) ok──▶ Loaded(target)
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info, warn};

use crate::common::config::{
    self, builtin_registry, DeploymentTarget, EnvironmentConfig, Registry,
};
use crate::common::error::ConfigError;

/// One source layered into the registry by [`ConfigProviderBuilder::build`].
#[derive(Debug)]
enum Source {
    Dir(PathBuf),
    Inline {
        target: DeploymentTarget,
        toml: String,
    },
}

/// Collects record sources, applied in insertion order over the built-ins.
#[derive(Debug)]
pub struct ConfigProviderBuilder {
    builtins: bool,
    sources: Vec<Source>,
}

impl ConfigProviderBuilder {
    /// Layer `<dir>/<target>.toml` files. Missing files are skipped.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sources.push(Source::Dir(dir.as_ref().to_path_buf()));
        self
    }

    /// Layer a record given as TOML text, e.g. `include_str!("prod.toml")`.
    pub fn with_toml(mut self, target: DeploymentTarget, toml: impl Into<String>) -> Self {
        self.sources.push(Source::Inline {
            target,
            toml: toml.into(),
        });
        self
    }

    /// Start from an empty registry instead of the compiled-in records.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn build(self) -> Result<ConfigProvider, ConfigError> {
        let mut registry = if self.builtins {
            builtin_registry()?
        } else {
            Registry::new()
        };
        for source in self.sources {
            match source {
                Source::Dir(dir) => config::register_dir(&mut registry, &dir)?,
                Source::Inline { target, toml } => {
                    config::register_str(&mut registry, target, &toml)?;
                    debug!(%target, "registered inline record");
                }
            }
        }
        debug!(targets = ?registry.keys().collect::<Vec<_>>(), "config registry built");
        Ok(ConfigProvider {
            registry,
            active: OnceLock::new(),
        })
    }
}

/// Holds one immutable record per deployment target.
#[derive(Debug)]
pub struct ConfigProvider {
    registry: Registry,
    active: OnceLock<(DeploymentTarget, EnvironmentConfig)>,
}

impl ConfigProvider {
    pub fn builder() -> ConfigProviderBuilder {
        ConfigProviderBuilder {
            builtins: true,
            sources: Vec::new(),
        }
    }

    /// Provider over the compiled-in records only.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Resolve and validate `target`, making it the active record.
    ///
    /// Loading the already-active target again returns the same record.
    /// Loading a different one is refused and leaves the active record as is.
    pub fn load(&self, target: DeploymentTarget) -> Result<&EnvironmentConfig, ConfigError> {
        if let Some((active, env)) = self.active.get() {
            return self.check_active(*active, target).map(|()| env);
        }

        let value = self.registry.get(&target).ok_or_else(|| {
            warn!(%target, "no configuration registered");
            ConfigError::NotFound {
                target: target.to_string(),
            }
        })?;
        let env = config::resolve(target, value).inspect_err(|e| {
            warn!(%target, error = %e, "configuration rejected");
        })?;

        // Another thread may have won the race; whichever record landed wins.
        let _ = self.active.set((target, env));
        let (active, env) = self.active.get().ok_or(ConfigError::NotLoaded)?;
        self.check_active(*active, target)?;

        info!(
            %target,
            production = env.production(),
            api_server_url = %env.api_server_url(),
            "configuration loaded"
        );
        Ok(env)
    }

    /// Parse `key` into a target, then [`load`](Self::load) it.
    pub fn load_named(&self, key: &str) -> Result<&EnvironmentConfig, ConfigError> {
        let target = key.parse::<DeploymentTarget>()?;
        self.load(target)
    }

    /// The active record.
    pub fn current(&self) -> Result<&EnvironmentConfig, ConfigError> {
        self.active
            .get()
            .map(|(_, env)| env)
            .ok_or(ConfigError::NotLoaded)
    }

    pub fn active_target(&self) -> Option<DeploymentTarget> {
        self.active.get().map(|(target, _)| *target)
    }

    pub fn is_loaded(&self) -> bool {
        self.active.get().is_some()
    }

    /// Registered targets, in declaration order.
    pub fn targets(&self) -> Vec<DeploymentTarget> {
        self.registry.keys().copied().collect()
    }

    /// Validate every registered record without changing the active one.
    pub fn check_all(&self) -> Result<(), ConfigError> {
        for (target, value) in &self.registry {
            config::resolve(*target, value)?;
            debug!(%target, "record valid");
        }
        Ok(())
    }

    fn check_active(
        &self,
        active: DeploymentTarget,
        requested: DeploymentTarget,
    ) -> Result<(), ConfigError> {
        if active == requested {
            return Ok(());
        }
        warn!(%active, %requested, "configuration already loaded");
        Err(ConfigError::AlreadyLoaded { active, requested })
    }
}
