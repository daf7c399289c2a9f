//! Provider backed by a directory bind.
//!
//! Authentication succeeds when the directory accepts a simple bind for the
//! DN built from the configured template. Invalid credentials are a plain
//! rejection; failing to reach the directory is a backend error.

use ldap3::LdapConnAsync;
use secrecy::{ExposeSecret as _, SecretString};

pub struct LdapProvider {
    url: String,
    bind_dn_template: String,
}

impl LdapProvider {
    #[must_use]
    pub fn new(url: String, bind_dn_template: String) -> Self {
        Self {
            url,
            bind_dn_template,
        }
    }

    fn bind_dn(&self, login: &str) -> String {
        self.bind_dn_template
            .replace("{login}", &escape_dn_value(login))
    }

    /// Attempts a simple bind as the submitted login.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is unreachable.
    pub async fn check(&self, login: &str, password: &SecretString) -> eyre::Result<bool> {
        let (conn, mut ldap) = LdapConnAsync::new(&self.url).await?;
        ldap3::drive!(conn);
        let result = ldap
            .simple_bind(&self.bind_dn(login), password.expose_secret())
            .await?;
        drop(ldap.unbind().await);
        // rc 0 is a successful bind; anything else (49 invalidCredentials
        // included) is a rejection.
        Ok(result.rc == 0)
    }
}

/// Escapes DN special characters (RFC 4514) in a single attribute value.
fn escape_dn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        let needs_escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (c == '#' && i == 0)
            || (c == ' ' && (i == 0 || i == last));
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
