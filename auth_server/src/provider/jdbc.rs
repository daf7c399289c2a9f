//! Provider backed by a relational store reached through a database URL.
//!
//! Schema, table and column names come from configuration; the submitted
//! password is run through the configured [`PasswordEncoding`] before
//! comparison. The raw password is never logged and never interpolated into
//! SQL.

use std::sync::Once;

use secrecy::{ExposeSecret as _, SecretString};
use sha2::{Digest as _, Sha256};
use sqlx::{AnyPool, Row as _, any::AnyPoolOptions};

use crate::config::PasswordEncoding;

static INSTALL_DRIVERS: Once = Once::new();

pub struct JdbcProvider {
    pool: AnyPool,
    query: String,
    encoding: PasswordEncoding,
}

impl JdbcProvider {
    /// Connects the backing pool and prepares the lookup query.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be set up for the given URL.
    pub async fn connect(
        url: &str,
        schema: Option<&str>,
        table: &str,
        login_column: &str,
        password_column: &str,
        encoding: PasswordEncoding,
    ) -> eyre::Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let pool = AnyPoolOptions::new()
            .max_connections(4)
            .connect_lazy(url)?;

        let qualified_table = match schema {
            Some(schema) => format!("{schema}.{table}"),
            None => table.to_string(),
        };
        // The Any driver passes placeholders through to the backend.
        let placeholder = if url.starts_with("postgres") { "$1" } else { "?" };
        let query = format!(
            "SELECT {password_column} FROM {qualified_table} WHERE {login_column} = {placeholder}"
        );

        Ok(Self {
            pool,
            query,
            encoding,
        })
    }

    /// Looks up the stored password for `login` and compares it against the
    /// encoded submitted password. A missing row and a mismatch are the same
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails.
    pub async fn check(&self, login: &str, password: &SecretString) -> eyre::Result<bool> {
        let row = sqlx::query(&self.query)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };
        let stored: String = row.try_get(0)?;
        Ok(match self.encoding {
            PasswordEncoding::None => stored == *password.expose_secret(),
            PasswordEncoding::Sha256 => {
                let digest = hex::encode(Sha256::digest(password.expose_secret().as_bytes()));
                stored.eq_ignore_ascii_case(&digest)
            }
        })
    }
}
