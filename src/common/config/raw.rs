//! Raw TOML deserialization types.
//!
//! These structs mirror the per-target file shape after `load` has rewritten
//! the legacy `auth0` / `url` key names. Every field is optional so
//! a file layered over a built-in record only names what it changes; the
//! `load` module fills the gaps and `validate` rejects what is still missing.

use serde::Deserialize;

/// Raw TOML shape, the serde target before resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawEnvironment {
    pub production: Option<bool>,
    pub api_server_url: Option<String>,
    #[serde(default)]
    pub auth: RawAuth,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawAuth {
    #[serde(rename = "domainPrefix")]
    pub domain_prefix: Option<String>,
    pub audience: Option<String>,
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposed_field_names_deserialize() {
        let raw: RawEnvironment = toml::from_str(
            r#"
production = true
apiServerUrl = "https://api.example.com"

[auth]
domainPrefix = "tenant.eu"
audience = "coffeeShopAPI"
clientId = "abc"
callbackURL = "https://shop.example.com"
"#,
        )
        .unwrap();
        assert_eq!(raw.production, Some(true));
        assert_eq!(raw.api_server_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(raw.auth.domain_prefix.as_deref(), Some("tenant.eu"));
        assert_eq!(raw.auth.callback_url.as_deref(), Some("https://shop.example.com"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw: RawEnvironment = toml::from_str("[meta]\nbase = \"x.toml\"\n").unwrap();
        assert!(raw.api_server_url.is_none());
    }
}
