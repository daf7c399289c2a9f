//! Application state shared across request handlers.

use core::time::Duration;
use std::sync::Arc;

use eyre::WrapErr as _;
use gatekeep_common::{TokenCodec, generate_secret};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::info;

use crate::{
    account::AccountService,
    code::AuthCodeStore,
    config::AuthServerConfig,
    provider::Provider,
};

/// Shared state: the account service and the pending code exchanges. Both
/// are read-only after startup apart from the code store's interior map.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub codes: Arc<AuthCodeStore>,
}

/// Builds the full application state from loaded configuration.
///
/// # Errors
///
/// Returns an error for an empty provider list or a provider whose backend
/// cannot be set up; both halt service start.
pub async fn initialize_state(config: &AuthServerConfig) -> eyre::Result<AppState> {
    let secret = match config.auth.secret {
        Some(ref secret) => SecretString::from(secret.expose_secret()),
        None => {
            let generated = generate_secret();
            // Logged once for operator use; configure a secret to make
            // tokens survive restarts.
            info!("No signing secret configured, generated one: {generated}");
            SecretString::from(generated)
        }
    };

    let validity = Duration::from_secs(config.auth.token_validity_days * 24 * 60 * 60);
    info!(
        "Auth server tokens will be valid for {} days",
        config.auth.token_validity_days
    );
    let codec = TokenCodec::new(secret, validity);

    let mut providers = Vec::with_capacity(config.providers.len());
    for provider_config in &config.providers {
        let provider = Provider::build(provider_config).await.wrap_err(format!(
            "Failed to set up {} provider",
            provider_config.kind()
        ))?;
        providers.push(provider);
    }

    let accounts = AccountService::new(providers, codec)?;
    let codes = AuthCodeStore::new(Duration::from_secs(config.auth.code_validity_secs));

    Ok(AppState {
        accounts: Arc::new(accounts),
        codes: Arc::new(codes),
    })
}
