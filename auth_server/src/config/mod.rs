//! Configuration management for the auth server: data types and TOML loading.

mod loader;
mod types;

pub use loader::*;
pub use types::*;
