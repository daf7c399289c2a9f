//! Account service: orchestrates the ordered provider list and token
//! issuance for a login attempt.

use gatekeep_common::TokenCodec;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, info};

use crate::provider::{Decision, Provider};

/// Login failure reported to callers. Deliberately carries no detail about
/// which provider rejected or why.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication failed")]
    Failed,
}

/// Startup-time configuration error for the account service.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("provider list is empty; configure at least one account provider")]
    NoProviders,
}

pub struct AccountService {
    providers: Vec<Provider>,
    codec: TokenCodec,
}

impl AccountService {
    /// Builds the service from an already-constructed provider list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoProviders`] for an empty list; this halts
    /// service start.
    pub fn new(providers: Vec<Provider>, codec: TokenCodec) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        Ok(Self { providers, codec })
    }

    /// Tries the providers in declared order; the first acceptance
    /// short-circuits into token issuance. No provider accepting is a
    /// uniform [`AuthError::Failed`].
    pub async fn login(&self, login: &str, password: &SecretString) -> Result<String, AuthError> {
        for provider in &self.providers {
            match provider.authenticate(login, password).await {
                Decision::Accepted => {
                    info!(login, provider = provider.kind(), "login accepted");
                    return Ok(self.codec.issue(login));
                }
                Decision::Rejected => {
                    debug!(provider = provider.kind(), "provider rejected login");
                }
            }
        }
        Err(AuthError::Failed)
    }

    /// The verify side of the issuing codec, for handlers that need it.
    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}
