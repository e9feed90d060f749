// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI configuration: TOML files with env-var overrides via Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/hearth/hearth.toml`, `~/.config/hearth/hearth.toml`,
//! `./hearth.toml`, then `HEARTH_*` environment variables.
//! All sections reject unknown keys at startup.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// Backend API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials and active group.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Backend API endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Credentials and active group.
///
/// The token is usually supplied via `HEARTH_AUTH_TOKEN` rather than a file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Bearer token for the backend. Unset means unauthenticated.
    pub token: Option<String>,

    /// Active group id. Required for group-scoped commands.
    pub group_id: Option<i64>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::file("/etc/hearth/hearth.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hearth/hearth.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hearth.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (tests, explicit config).
pub fn load_config_from_str(toml_content: &str) -> Result<HearthConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HearthConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// `HEARTH_` env provider using explicit `map()` for section-to-dot mapping,
/// so keys containing underscores (e.g. `HEARTH_AUTH_GROUP_ID` ->
/// `auth.group_id`) are not split ambiguously.
fn env_provider() -> Env {
    Env::prefixed("HEARTH_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = load_config_from_str("").expect("empty config should use defaults");
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.auth.token, None);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn full_config_deserializes() {
        let toml = r#"
[api]
base_url = "https://hearth.example.com/api/v1"

[auth]
token = "tok-abc"
group_id = 7

[log]
level = "debug"
"#;
        let config = load_config_from_str(toml).expect("valid TOML");
        assert_eq!(config.api.base_url, "https://hearth.example.com/api/v1");
        assert_eq!(config.auth.token.as_deref(), Some("tok-abc"));
        assert_eq!(config.auth.group_id, Some(7));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[api]
base_uri = "typo"
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn env_overrides_map_to_dotted_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HEARTH_API_BASE_URL", "https://env.example.com");
            jail.set_env("HEARTH_AUTH_GROUP_ID", "9");
            let config: HearthConfig = Figment::new()
                .merge(Serialized::defaults(HearthConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.api.base_url, "https://env.example.com");
            assert_eq!(config.auth.group_id, Some(9));
            Ok(())
        });
    }
}
