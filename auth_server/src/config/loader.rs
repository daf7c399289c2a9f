//! Configuration loading utilities for the auth server.

use std::path::Path;

use eyre::WrapErr as _;
use tokio::fs;

use crate::config::AuthServerConfig;

/// Reads and parses the auth server config from a TOML file.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed. An unknown
/// provider `type` is a parse error.
pub async fn load<P: AsRef<Path>>(path: P) -> eyre::Result<AuthServerConfig> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(&path).await.wrap_err(format!(
        "Failed to read config file at: {}",
        path_ref.display()
    ))?;
    let config: AuthServerConfig = toml::from_str(&content).wrap_err(format!(
        "Failed to parse config as TOML at: {}",
        path_ref.display()
    ))?;
    Ok(config)
}
