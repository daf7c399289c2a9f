//! Client-side half of the gatekeep single-sign-on handshake.
//!
//! A client application protects its routes with the [`middleware::require`]
//! layer: auth codes arriving from the auth server's redirect are exchanged
//! for tokens, tokens carried in cookies or headers are validated entirely
//! locally against the shared secret, and unauthenticated requests are sent
//! to the auth server's login page with a return target.

pub mod cli;
pub mod config;
pub mod cookies;
pub mod demo;
pub mod middleware;
pub mod token_service;

use eyre::{Result, WrapErr as _};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// The demo app's main function; can be called from a shim binary.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the server
/// fails to start.
pub async fn inner_main(invocation: Cli) -> Result<()> {
    match invocation.command {
        Command::Serve(args) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .compact()
                .init();

            let config_path = fs::canonicalize(&args.config)
                .wrap_err(format!("Config file not found at: {}", args.config))?;
            info!("Starting demo app with config at {}", config_path.display());

            demo::start(&config_path, args.port, args.bind.as_deref()).await
        }
    }
}
