//! Cookie handling for the token cookie.

use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};

use crate::config::ClientConfig;

/// Builds the token cookie with a refreshed sliding lifetime.
///
/// `SameSite::Lax` because the handshake lands on the app via a redirect
/// from the auth server, and the cookie must accompany that navigation.
#[must_use]
pub fn create_token_cookie(config: &ClientConfig, token: &str) -> Cookie<'static> {
    let max_age_days: i64 = config
        .cookie_validity_days
        .try_into()
        .expect("cookie lifetime is impossibly high");
    Cookie::build((config.cookie_name.clone(), token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(max_age_days))
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::config::TokenSources;

    #[test]
    fn token_cookie_shape() {
        let config = ClientConfig {
            auth_server_url: "http://auth.example".to_string(),
            secret: Arc::new(SecretString::from("s")),
            cookie_name: "gatekeep_token".to_string(),
            token_sources: TokenSources::Both,
            cookie_validity_days: 15,
            exchange_timeout_secs: 5,
        };
        let cookie = create_token_cookie(&config, "tok");
        assert_eq!(cookie.name(), "gatekeep_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::days(15)));
        assert_eq!(cookie.path(), Some("/"));
    }
}
