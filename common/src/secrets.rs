//! Secret generation utilities.
//!
//! Used for generating the signing secret when the configuration omits one,
//! and for the short-lived auth codes handed out during the login handshake.

use rand::Rng as _;

/// Generates a random secret string suitable for use as an HMAC key.
///
/// Returns a 32-character alphanumeric string.
#[must_use]
pub fn generate_secret() -> String {
    // Simple random secret generation: 32 characters
    let mut rng = rand::rng();
    (0..32)
        .map(|_| rng.sample(rand::distr::Alphanumeric) as char)
        .collect()
}
