//! Account providers: the pluggable credential-verification backends.
//!
//! The set is closed (`always_true`, `in_memory`, `jdbc`, `ldap`) and
//! selected by configuration at startup; dispatch is a plain `match` over the
//! variant. Providers are pure predicate checks: no side effects on failure,
//! and a rejection never reveals whether the login was unknown or the
//! password wrong.

mod always_true;
mod in_memory;
mod jdbc;
mod ldap;

pub use always_true::AlwaysTrueProvider;
pub use in_memory::InMemoryProvider;
pub use jdbc::JdbcProvider;
pub use ldap::LdapProvider;

use secrecy::SecretString;
use tracing::{info, warn};

use crate::config::ProviderConfig;

/// Outcome of a single provider check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected,
}

/// A configured account provider.
pub enum Provider {
    AlwaysTrue(AlwaysTrueProvider),
    InMemory(InMemoryProvider),
    Jdbc(JdbcProvider),
    Ldap(LdapProvider),
}

impl Provider {
    /// Builds a provider from its config entry.
    ///
    /// # Errors
    ///
    /// Returns an error if backend setup fails (e.g. an invalid database
    /// URL); this aborts startup.
    pub async fn build(config: &ProviderConfig) -> eyre::Result<Self> {
        let provider = match *config {
            ProviderConfig::AlwaysTrue => {
                info!("Adding an always_true provider (TEST ONLY)");
                Self::AlwaysTrue(AlwaysTrueProvider)
            }
            ProviderConfig::InMemory { ref users } => {
                info!(users = users.len(), "Adding an in_memory provider");
                Self::InMemory(InMemoryProvider::new(users.clone()))
            }
            ProviderConfig::Jdbc {
                ref url,
                ref schema,
                ref table,
                ref login_column,
                ref password_column,
                password_encoding,
            } => {
                info!(table, "Adding a jdbc provider");
                Self::Jdbc(
                    JdbcProvider::connect(
                        url,
                        schema.as_deref(),
                        table,
                        login_column,
                        password_column,
                        password_encoding,
                    )
                    .await?,
                )
            }
            ProviderConfig::Ldap {
                ref url,
                ref bind_dn_template,
            } => {
                info!(url, "Adding an ldap provider");
                Self::Ldap(LdapProvider::new(url.clone(), bind_dn_template.clone()))
            }
        };
        Ok(provider)
    }

    /// Stable identifier of the provider kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match *self {
            Self::AlwaysTrue(_) => "always_true",
            Self::InMemory(_) => "in_memory",
            Self::Jdbc(_) => "jdbc",
            Self::Ldap(_) => "ldap",
        }
    }

    /// Checks one credential pair against this provider's backend.
    ///
    /// A backend error (store unreachable, query failed) is logged as a
    /// distinct condition but reported as `Rejected`, so later providers in
    /// the list still get their turn and the caller learns nothing about the
    /// cause.
    pub async fn authenticate(&self, login: &str, password: &SecretString) -> Decision {
        let checked = match *self {
            Self::AlwaysTrue(ref provider) => Ok(provider.check(login, password)),
            Self::InMemory(ref provider) => Ok(provider.check(login, password)),
            Self::Jdbc(ref provider) => provider.check(login, password).await,
            Self::Ldap(ref provider) => provider.check(login, password).await,
        };
        match checked {
            Ok(true) => Decision::Accepted,
            Ok(false) => Decision::Rejected,
            Err(error) => {
                warn!(provider = self.kind(), %error, "provider backend error, treating as rejection");
                Decision::Rejected
            }
        }
    }
}
