//! Network client for the auth server's code-for-token exchange.

use core::time::Duration;

use eyre::WrapErr as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an exchange did not produce a token. Callers treat every variant the
/// same way: the request stays unauthenticated and falls through to the
/// login redirect.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Network failure or timeout reaching the auth server.
    #[error("exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The auth server answered, but refused the code.
    #[error("auth server rejected the code (status {0})")]
    Rejected(reqwest::StatusCode),
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    code: &'a str,
}

#[derive(Deserialize)]
struct ExchangeResponse {
    token: String,
}

/// Talks to the auth server's `/token` endpoint.
#[derive(Clone)]
pub struct TokenService {
    http: reqwest::Client,
    exchange_url: String,
}

impl TokenService {
    /// Builds the service with a hard timeout on every exchange call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(auth_server_url: &str, timeout: Duration) -> eyre::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("failed to build HTTP client for token exchange")?;
        Ok(Self {
            http,
            exchange_url: format!("{}/token", auth_server_url.trim_end_matches('/')),
        })
    }

    /// Exchanges an auth code for a token, one network round trip.
    ///
    /// # Errors
    ///
    /// Any transport problem or non-success response is an [`ExchangeError`].
    pub async fn exchange(&self, code: &str) -> Result<String, ExchangeError> {
        let response = self
            .http
            .post(&self.exchange_url)
            .json(&ExchangeRequest { code })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ExchangeError::Rejected(response.status()));
        }
        let body: ExchangeResponse = response.json().await?;
        Ok(body.token)
    }
}
