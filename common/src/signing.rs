//! HMAC signing utilities for the token payload.
//!
//! This module provides functions for creating and checking HMAC-SHA256
//! signatures over token payloads with the process-wide shared secret.

use hmac::{Hmac, Mac as _};
use secrecy::ExposeSecret as _;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

/// Creates an HMAC instance for the given message and secret.
#[must_use]
fn create_hmac(message: &str, secret: &[u8]) -> Hmac<Sha256> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take a key of any size");
    mac.update(message.as_bytes());
    mac
}

/// Signs a message with HMAC using the provided secret.
#[must_use]
pub fn sign_hmac(message: &str, secret: &secrecy::SecretString) -> String {
    let mac = create_hmac(message, secret.expose_secret().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a hex-encoded signature against a message in constant time.
///
/// Malformed hex counts as a mismatch.
#[must_use]
pub fn verify_hmac(message: &str, received_signature: &str, secret: &secrecy::SecretString) -> bool {
    let Ok(signature_bytes) = hex::decode(received_signature) else {
        return false;
    };
    create_hmac(message, secret.expose_secret().as_bytes())
        .verify_slice(&signature_bytes)
        .is_ok()
}

/// Gets the current Unix timestamp in seconds.
#[must_use]
pub fn unix_time_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}
