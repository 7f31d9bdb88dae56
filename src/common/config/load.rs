//! Record sources: compiled-in defaults and per-target TOML files.
//!
//! Files support `[meta] base = "..."` inheritance chains. Every layer is
//! deep-merged onto the one below it, so a file only names what it changes.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::common::error::ConfigError;

use super::raw::RawEnvironment;
use super::types::{DeploymentTarget, EnvironmentConfig};
use super::validate::{check_types, validate};

/// Unvalidated, merged TOML for each registered target.
pub(crate) type Registry = BTreeMap<DeploymentTarget, toml::Value>;

/// Local development record: Flask API on :5000, Ionic app on :8100.
const DEVELOPMENT_TOML: &str = r#"
production = false
apiServerUrl = "http://127.0.0.1:5000"

[auth]
domainPrefix = "dev-nmyxk7hftomeflrd.us"
audience = "coffeeShopAPI"
clientId = "XpxupYBUrbw1RxlUZIZzt5qy5zUxLR5t"
callbackURL = "http://localhost:8100"
"#;

/// Records compiled into the binary.
pub(crate) fn builtin_registry() -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    let development = parse_toml(DEVELOPMENT_TOML, "built-in development record")?;
    registry.insert(DeploymentTarget::Development, development);
    Ok(registry)
}

/// Deep-merge two TOML values.
/// Tables are merged recursively; the overlay only needs to specify keys that
/// differ from the base. For every other type the overlay value replaces the
/// base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Rewrite the legacy `auth0` / `url` key names to `auth` / `domainPrefix`
/// so layers written either way merge key-for-key.
fn normalize_aliases(value: &mut toml::Value) {
    let Some(root) = value.as_table_mut() else {
        return;
    };
    if let Some(legacy) = root.remove("auth0") {
        let merged = match root.remove("auth") {
            Some(current) => merge_toml(legacy, current),
            None => legacy,
        };
        root.insert("auth".into(), merged);
    }
    if let Some(auth) = root.get_mut("auth").and_then(|a| a.as_table_mut()) {
        if let Some(prefix) = auth.remove("url") {
            auth.entry("domainPrefix").or_insert(prefix);
        }
    }
}

fn parse_toml(text: &str, origin: &str) -> Result<toml::Value, ConfigError> {
    let mut value: toml::Value = toml::from_str(text)
        .map_err(|e| ConfigError::Source(format!("parse error in {origin}: {e}")))?;
    normalize_aliases(&mut value);
    Ok(value)
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<toml::Value, ConfigError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(ConfigError::Source(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::Source(format!("cannot read {}: {e}", path.display())))?;
    let overlay_val = parse_toml(&text, &path.display().to_string())?;

    let base_str = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
        .map(str::to_owned);

    match base_str {
        Some(base_str) => {
            let base_path = if Path::new(&base_str).is_absolute() {
                PathBuf::from(&base_str)
            } else {
                path.parent().unwrap_or(Path::new(".")).join(&base_str)
            };
            let base_val = load_raw_merged(&base_path, visited)?;
            Ok(merge_toml(base_val, overlay_val))
        }
        None => Ok(overlay_val),
    }
}

/// Merge `layer` over whatever `registry` already holds for `target`.
fn register_layer(registry: &mut Registry, target: DeploymentTarget, layer: toml::Value) {
    let merged = match registry.remove(&target) {
        Some(existing) => merge_toml(existing, layer),
        None => layer,
    };
    registry.insert(target, merged);
}

/// Register a record given as TOML text (e.g. `include_str!`-ed at build time).
pub(crate) fn register_str(
    registry: &mut Registry,
    target: DeploymentTarget,
    text: &str,
) -> Result<(), ConfigError> {
    let layer = parse_toml(text, &format!("inline {target} record"))?;
    register_layer(registry, target, layer);
    Ok(())
}

/// Scan `dir` for `<target>.toml` files and layer each one into `registry`.
/// A missing directory or file is skipped; an unreadable one is an error.
pub(crate) fn register_dir(registry: &mut Registry, dir: &Path) -> Result<(), ConfigError> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "config dir absent, using built-in records only");
        return Ok(());
    }
    for target in DeploymentTarget::ALL {
        let path = dir.join(format!("{}.toml", target.as_str()));
        if !path.exists() {
            continue;
        }
        let layer = load_raw_merged(&path, &mut HashSet::new())?;
        debug!(%target, path = %path.display(), "registered config file");
        register_layer(registry, target, layer);
    }
    Ok(())
}

/// Deserialize and validate the merged record for `target`.
pub(crate) fn resolve(
    target: DeploymentTarget,
    value: &toml::Value,
) -> Result<EnvironmentConfig, ConfigError> {
    check_types(target, value)?;
    let raw: RawEnvironment =
        Deserialize::deserialize(value.clone()).map_err(|e: toml::de::Error| {
            ConfigError::Validation {
                target,
                field: "record",
                reason: e.to_string(),
            }
        })?;
    validate(target, raw)
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
