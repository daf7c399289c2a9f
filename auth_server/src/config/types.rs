//! Configuration data types for the auth server.
//!
//! The ordered `[[providers]]` list is a serde-tagged closed set; an unknown
//! provider name fails deserialization, which makes a typo a fatal startup
//! error rather than a silently skipped entry.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;

/// Root config structure for the auth server.
#[derive(Debug, Deserialize, Default)]
pub struct AuthServerConfig {
    /// HTTP server binding configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token issuance settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Ordered list of account providers, tried first to last on login.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// HTTP server binding configuration section.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// TCP port for the auth server.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address for the HTTP listener.
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

/// Token issuance settings.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared signing secret. If omitted, a random secret is generated and
    /// logged once on startup; tokens then do not survive a restart.
    #[serde(default)]
    pub secret: Option<Arc<SecretString>>,
    /// Token validity window in days.
    #[serde(default = "default_token_validity_days")]
    pub token_validity_days: u64,
    /// Auth code validity in seconds. Codes are single-use regardless.
    #[serde(default = "default_code_validity_secs")]
    pub code_validity_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_validity_days: default_token_validity_days(),
            code_validity_secs: default_code_validity_secs(),
        }
    }
}

/// One entry of the ordered provider list.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Accepts any credential pair. Test and demo configurations only.
    AlwaysTrue,
    /// Fixed login -> password mapping loaded from the config file.
    InMemory {
        #[serde(default)]
        users: HashMap<String, Arc<SecretString>>,
    },
    /// Relational store reached through a database URL.
    Jdbc {
        /// Database URL, e.g. `postgres://…` or `sqlite://…`.
        url: String,
        /// Optional schema the accounts table lives in.
        #[serde(default)]
        schema: Option<String>,
        /// Table holding the accounts.
        table: String,
        /// Column holding the login.
        login_column: String,
        /// Column holding the (possibly encoded) password.
        password_column: String,
        /// Encoding applied to the submitted password before comparison.
        #[serde(default)]
        password_encoding: PasswordEncoding,
    },
    /// Directory bind against an LDAP server.
    Ldap {
        /// LDAP server URL, e.g. `ldap://directory.example:389`.
        url: String,
        /// Template for the bind DN; `{login}` is replaced with the
        /// submitted login, e.g. `uid={login},ou=people,dc=example,dc=com`.
        bind_dn_template: String,
    },
}

impl ProviderConfig {
    /// Stable identifier of the provider kind, as used in config and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match *self {
            Self::AlwaysTrue => "always_true",
            Self::InMemory { .. } => "in_memory",
            Self::Jdbc { .. } => "jdbc",
            Self::Ldap { .. } => "ldap",
        }
    }
}

/// Password encoding applied before comparing against the stored value.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PasswordEncoding {
    /// Stored passwords are plain text.
    #[default]
    None,
    /// Stored passwords are hex-encoded SHA-256 digests.
    Sha256,
}

fn default_port() -> u16 {
    7420
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

const fn default_token_validity_days() -> u64 {
    15
}

const fn default_code_validity_secs() -> u64 {
    60
}
