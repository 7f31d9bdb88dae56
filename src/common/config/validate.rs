//! Shape checks that turn a raw record into an [`EnvironmentConfig`].

use url::Url;

use crate::common::error::ConfigError;

use super::raw::RawEnvironment;
use super::types::{AuthConfig, DeploymentTarget, EnvironmentConfig};

/// Expected TOML kind of each exposed field, by dotted path.
const FIELD_KINDS: [(&str, &str, Kind); 6] = [
    ("production", "production", Kind::Boolean),
    ("apiServerUrl", "apiServerUrl", Kind::String),
    ("auth.domainPrefix", "domainPrefix", Kind::String),
    ("auth.audience", "audience", Kind::String),
    ("auth.clientId", "clientId", Kind::String),
    ("auth.callbackURL", "callbackURL", Kind::String),
];

#[derive(Clone, Copy)]
enum Kind {
    Boolean,
    String,
}

impl Kind {
    fn matches(self, value: &toml::Value) -> bool {
        match self {
            Kind::Boolean => value.is_bool(),
            Kind::String => value.is_str(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Boolean => "a boolean",
            Kind::String => "a string",
        }
    }
}

/// Reject present fields whose TOML type is wrong, before serde sees them.
pub(super) fn check_types(
    target: DeploymentTarget,
    value: &toml::Value,
) -> Result<(), ConfigError> {
    let Some(root) = value.as_table() else {
        return Err(ConfigError::Validation {
            target,
            field: "record",
            reason: format!("must be a table, found {}", value.type_str()),
        });
    };
    let auth = match root.get("auth") {
        None => None,
        Some(toml::Value::Table(auth)) => Some(auth),
        Some(other) => {
            return Err(ConfigError::Validation {
                target,
                field: "auth",
                reason: format!("must be a table, found {}", other.type_str()),
            });
        }
    };

    for (field, key, kind) in FIELD_KINDS {
        let found = if field.starts_with("auth.") {
            auth.and_then(|a| a.get(key))
        } else {
            root.get(key)
        };
        if let Some(found) = found.filter(|v| !kind.matches(v)) {
            return Err(ConfigError::Validation {
                target,
                field,
                reason: format!("must be {}, found {}", kind.name(), found.type_str()),
            });
        }
    }
    Ok(())
}

/// Validate `raw` for `target`.
///
/// A missing `production` flag defaults to whether `target` is the
/// production tier; every other field is required.
pub(super) fn validate(
    target: DeploymentTarget,
    raw: RawEnvironment,
) -> Result<EnvironmentConfig, ConfigError> {
    let production = raw
        .production
        .unwrap_or(target == DeploymentTarget::Production);
    let api_server_url = required_url(target, "apiServerUrl", raw.api_server_url)?;

    let auth = AuthConfig {
        domain_prefix: required_text(target, "auth.domainPrefix", raw.auth.domain_prefix)?,
        audience: required_text(target, "auth.audience", raw.auth.audience)?,
        client_id: required_text(target, "auth.clientId", raw.auth.client_id)?,
        callback_url: required_url(target, "auth.callbackURL", raw.auth.callback_url)?,
    };

    Ok(EnvironmentConfig {
        production,
        api_server_url,
        auth,
    })
}

fn required_text(
    target: DeploymentTarget,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ConfigError> {
    let invalid = |reason: &str| ConfigError::Validation {
        target,
        field,
        reason: reason.to_string(),
    };
    let value = value.ok_or_else(|| invalid("is missing"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn required_url(
    target: DeploymentTarget,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ConfigError> {
    let text = required_text(target, field, value)?;
    let url = Url::parse(&text).map_err(|e| ConfigError::Validation {
        target,
        field,
        reason: format!("is not a valid URL ('{text}'): {e}"),
    })?;
    if !url.has_host() {
        return Err(ConfigError::Validation {
            target,
            field,
            reason: format!("must be an absolute URL with a host ('{text}')"),
        });
    }
    Ok(text)
}
