//! Public configuration types.
//!
//! These are the resolved, validated records handed to consumers.
//! Raw TOML deserialization types live in `raw.rs`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::Url;

use crate::common::error::ConfigError;

/// Suffix appended to the tenant prefix to form the identity provider host.
const AUTH_HOST_SUFFIX: &str = "auth0.com";

// ── Deployment target ───────────────────────────────────────────────────────

/// Named build/runtime configuration variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeploymentTarget {
    Development,
    Staging,
    Production,
}

impl DeploymentTarget {
    pub const ALL: [DeploymentTarget; 3] = [
        DeploymentTarget::Development,
        DeploymentTarget::Staging,
        DeploymentTarget::Production,
    ];

    /// Canonical key, also the stem of the per-target TOML file.
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentTarget::Development => "development",
            DeploymentTarget::Staging => "staging",
            DeploymentTarget::Production => "production",
        }
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(DeploymentTarget::Development),
            "staging" => Ok(DeploymentTarget::Staging),
            "production" | "prod" => Ok(DeploymentTarget::Production),
            _ => Err(ConfigError::NotFound { target: s.to_string() }),
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Identity provider settings for the login redirect flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthConfig {
    #[serde(rename = "domainPrefix")]
    pub(super) domain_prefix: String,
    pub(super) audience: String,
    #[serde(rename = "clientId")]
    pub(super) client_id: String,
    #[serde(rename = "callbackURL")]
    pub(super) callback_url: String,
}

impl AuthConfig {
    /// Tenant identifier within the identity provider (e.g. `dev-xxxx.us`).
    pub fn domain_prefix(&self) -> &str {
        &self.domain_prefix
    }

    /// Protected API resource that issued tokens are scoped to.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Where the provider redirects after login.
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Fully-qualified identity provider host.
    pub fn tenant_domain(&self) -> String {
        format!("{}.{AUTH_HOST_SUFFIX}", self.domain_prefix)
    }

    /// Token issuer, checked alongside [`audience`](Self::audience).
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.tenant_domain())
    }

    /// Login link for the implicit flow, redirecting back to the callback URL.
    pub fn authorize_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&format!("https://{}/authorize", self.tenant_domain()))
            .map_err(|e| {
                ConfigError::Source(format!(
                    "cannot build authorize url for tenant '{}': {e}",
                    self.domain_prefix
                ))
            })?;
        url.query_pairs_mut()
            .append_pair("audience", &self.audience)
            .append_pair("response_type", "token")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.callback_url);
        Ok(url)
    }
}

// ── Environment (root) ───────────────────────────────────────────────────────

/// Fully-resolved environment record.
///
/// Only obtainable through the loader, which validates it first; fields are
/// read-only from outside this module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    pub(super) production: bool,
    #[serde(rename = "apiServerUrl")]
    pub(super) api_server_url: String,
    pub(super) auth: AuthConfig,
}

impl EnvironmentConfig {
    pub fn production(&self) -> bool {
        self.production
    }

    /// Base URL of the backend API, exactly as configured.
    pub fn api_server_url(&self) -> &str {
        &self.api_server_url
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Join `path` (e.g. `/drinks`) onto the API base URL.
    pub fn api_endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.api_server_url).map_err(|e| {
            ConfigError::Source(format!("bad apiServerUrl '{}': {e}", self.api_server_url))
        })?;
        base.join(path)
            .map_err(|e| ConfigError::Source(format!("cannot join '{path}' onto api url: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_auth() -> AuthConfig {
        AuthConfig {
            domain_prefix: "dev-nmyxk7hftomeflrd.us".into(),
            audience: "coffeeShopAPI".into(),
            client_id: "XpxupYBUrbw1RxlUZIZzt5qy5zUxLR5t".into(),
            callback_url: "http://localhost:8100".into(),
        }
    }

    #[test]
    fn target_parses_aliases_case_insensitively() {
        let parse = |key: &str| key.parse::<DeploymentTarget>().unwrap();
        assert_eq!(parse("Development"), DeploymentTarget::Development);
        assert_eq!(parse("dev"), DeploymentTarget::Development);
        assert_eq!(parse(" PROD "), DeploymentTarget::Production);
        assert_eq!(parse("staging"), DeploymentTarget::Staging);
    }

    #[test]
    fn unknown_target_is_not_found() {
        match "nonexistent".parse::<DeploymentTarget>() {
            Err(ConfigError::NotFound { target }) => assert_eq!(target, "nonexistent"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn target_display_round_trips() {
        for t in DeploymentTarget::ALL {
            assert_eq!(t.to_string().parse::<DeploymentTarget>().unwrap(), t);
        }
    }

    #[test]
    fn tenant_domain_and_issuer() {
        let auth = sample_auth();
        assert_eq!(auth.tenant_domain(), "dev-nmyxk7hftomeflrd.us.auth0.com");
        assert_eq!(auth.issuer(), "https://dev-nmyxk7hftomeflrd.us.auth0.com/");
    }

    #[test]
    fn authorize_url_carries_login_params() {
        let url = sample_auth().authorize_url().unwrap();
        assert_eq!(url.host_str(), Some("dev-nmyxk7hftomeflrd.us.auth0.com"));
        assert_eq!(url.path(), "/authorize");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("audience".into(), "coffeeShopAPI".into())));
        assert!(pairs.contains(&("response_type".into(), "token".into())));
        assert!(pairs.contains(&("client_id".into(), "XpxupYBUrbw1RxlUZIZzt5qy5zUxLR5t".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://localhost:8100".into())));
    }

    #[test]
    fn api_endpoint_joins_route() {
        let env = EnvironmentConfig {
            production: false,
            api_server_url: "http://127.0.0.1:5000".into(),
            auth: sample_auth(),
        };
        let url = env.api_endpoint("/drinks-detail").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/drinks-detail");
    }
}
