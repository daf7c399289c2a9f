//! Configuration data types and loading for client applications.

use std::path::Path;
use std::sync::Arc;

use eyre::WrapErr as _;
use secrecy::SecretString;
use serde::Deserialize;
use tokio::fs;

/// Where the token middleware looks for an inbound token.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenSources {
    /// Cookie only.
    Cookie,
    /// `Authorization: Bearer` header only.
    Header,
    /// Cookie first, then header.
    #[default]
    Both,
}

/// Settings shared by every protected route of a client application.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the auth server, e.g. `http://auth.example`.
    pub auth_server_url: String,
    /// Shared verification secret; must match the auth server's signing
    /// secret.
    pub secret: Arc<SecretString>,
    /// Name of the token cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Inbound token delivery policy.
    #[serde(default)]
    pub token_sources: TokenSources,
    /// Sliding cookie lifetime in days; refreshed on every authenticated
    /// response.
    #[serde(default = "default_cookie_validity_days")]
    pub cookie_validity_days: u64,
    /// Timeout for the code-for-token exchange call, in seconds.
    #[serde(default = "default_exchange_timeout_secs")]
    pub exchange_timeout_secs: u64,
}

/// HTTP server binding configuration for the demo app.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// Root config structure for the demo client app.
#[derive(Debug, Deserialize)]
pub struct DemoAppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub client: ClientConfig,
}

/// Reads and parses a demo app config from a TOML file.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub async fn load<P: AsRef<Path>>(path: P) -> eyre::Result<DemoAppConfig> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(&path).await.wrap_err(format!(
        "Failed to read config file at: {}",
        path_ref.display()
    ))?;
    let config: DemoAppConfig = toml::from_str(&content).wrap_err(format!(
        "Failed to parse config as TOML at: {}",
        path_ref.display()
    ))?;
    Ok(config)
}

pub(crate) fn default_cookie_name() -> String {
    "gatekeep_token".to_string()
}

const fn default_cookie_validity_days() -> u64 {
    15
}

const fn default_exchange_timeout_secs() -> u64 {
    5
}

fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use secrecy::ExposeSecret as _;

    use super::*;

    #[tokio::test]
    async fn load_demo_app_config() {
        let toml_str = r#"
            [server]
            port = 8081

            [client]
            auth_server_url = "http://auth.example"
            secret = "shared"
            token_sources = "cookie"
        "#;
        let tmp = env::temp_dir().join("gatekeep_demo_app_test.toml");
        fs::write(&tmp, toml_str).unwrap();
        let cfg = load(&tmp).await.unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.client.auth_server_url, "http://auth.example");
        assert_eq!(cfg.client.secret.expose_secret(), "shared");
        assert_eq!(cfg.client.token_sources, TokenSources::Cookie);
        assert_eq!(cfg.client.cookie_name, "gatekeep_token");
        assert_eq!(cfg.client.cookie_validity_days, 15);
    }

    #[tokio::test]
    async fn client_section_is_required() {
        let tmp = env::temp_dir().join("gatekeep_demo_app_empty.toml");
        fs::write(&tmp, "[server]\nport = 8081\n").unwrap();
        assert!(load(&tmp).await.is_err());
    }
}
