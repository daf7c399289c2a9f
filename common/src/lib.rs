//! Shared token machinery for the gatekeep auth server and its client apps.
//!
//! This crate provides:
//! - HMAC-SHA256 signing primitives over the shared secret
//! - Random secret and auth-code generation
//! - The token codec: issuance on the server, verification everywhere

mod secrets;
mod signing;
mod token;

pub use secrets::*;
pub use signing::*;
pub use token::*;
