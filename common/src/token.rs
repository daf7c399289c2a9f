//! The token codec: signed, time-bounded, self-contained identity tokens.
//!
//! A token carries `principal|issued_at|expires_at` plus an HMAC-SHA256
//! signature over that payload, the whole thing base64url-encoded so it is
//! opaque and cookie-safe. Any party holding the shared secret can verify a
//! token locally; only the auth server's [`TokenCodec`] issues them, client
//! applications get the verify-only [`ReadOnlyTokenCodec`].

use core::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as base64_url};
use secrecy::SecretString;
use serde::Serialize;

use crate::signing::{sign_hmac, unix_time_seconds, verify_hmac};

/// Default token validity window: 15 days.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(15 * 24 * 60 * 60);

/// The identity resolved from a valid token, rebuilt from the token on every
/// request. Never persisted between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Login the token was issued for.
    pub id: String,
    /// Unix timestamp (seconds) of issuance.
    pub issued_at: u64,
    /// Unix timestamp (seconds) at which the token stops being valid.
    pub expires_at: u64,
}

/// Outcome of verifying a token.
///
/// Malformed input, a bad signature and an expired token are deliberately not
/// distinguished, so a failed verification cannot be probed for its cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidation {
    Valid(Principal),
    Invalid,
}

impl TokenValidation {
    /// Returns the principal for a valid token, `None` otherwise.
    #[must_use]
    pub fn into_principal(self) -> Option<Principal> {
        match self {
            Self::Valid(principal) => Some(principal),
            Self::Invalid => None,
        }
    }
}

/// Issuing-side codec, held only by the auth server.
pub struct TokenCodec {
    secret: SecretString,
    validity: Duration,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: SecretString, validity: Duration) -> Self {
        Self { secret, validity }
    }

    /// Issues a token for `principal_id`, stamped with the current time and
    /// the configured validity window.
    #[must_use]
    pub fn issue(&self, principal_id: &str) -> String {
        self.issue_at(principal_id, unix_time_seconds())
    }

    fn issue_at(&self, principal_id: &str, now: u64) -> String {
        let expires_at = now.saturating_add(self.validity.as_secs());
        let payload = format!("{principal_id}|{now}|{expires_at}");
        let signature = sign_hmac(&payload, &self.secret);
        base64_url.encode(format!("{payload}|{signature}"))
    }

    /// Verifies a token; see [`ReadOnlyTokenCodec::verify`].
    #[must_use]
    pub fn verify(&self, token: &str) -> TokenValidation {
        verify_token(token, &self.secret, unix_time_seconds())
    }

    /// Derives the verify-only counterpart holding the same secret, for
    /// handing to client-side validation.
    #[must_use]
    pub fn read_only(&self) -> ReadOnlyTokenCodec {
        ReadOnlyTokenCodec::new(self.secret.clone())
    }
}

/// Client-side codec: can check signature validity and expiry, exposes no
/// issuance operation.
pub struct ReadOnlyTokenCodec {
    secret: SecretString,
}

impl ReadOnlyTokenCodec {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verifies signature and expiry of a candidate token.
    ///
    /// Pure and side-effect-free; safe to call on every request. A token is
    /// invalid from exactly `expires_at` onwards.
    #[must_use]
    pub fn verify(&self, token: &str) -> TokenValidation {
        verify_token(token, &self.secret, unix_time_seconds())
    }
}

fn verify_token(token: &str, secret: &SecretString, now: u64) -> TokenValidation {
    let Some(principal) = decode_token(token, secret) else {
        return TokenValidation::Invalid;
    };
    if now >= principal.expires_at {
        return TokenValidation::Invalid;
    }
    TokenValidation::Valid(principal)
}

fn decode_token(token: &str, secret: &SecretString) -> Option<Principal> {
    let decoded = base64_url.decode(token).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let mut parts = decoded.rsplitn(2, '|');
    let signature = parts.next()?;
    let payload = parts.next()?;
    if !verify_hmac(payload, signature, secret) {
        return None;
    }

    // principal id may itself contain '|', so split off timestamps from the right
    let mut fields = payload.rsplitn(3, '|');
    let expires_at = fields.next()?.parse().ok()?;
    let issued_at = fields.next()?.parse().ok()?;
    let id = fields.next()?.to_string();
    Some(Principal {
        id,
        issued_at,
        expires_at,
    })
}
