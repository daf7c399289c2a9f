//! Library entry for the gatekeep auth server.
//!
//! Exposes `inner_main` so the shim binary (and tests) can call into the
//! server logic: credential verification against the configured account
//! providers, token issuance, and the login / code-exchange HTTP surface.

pub mod account;
pub mod cli;
pub mod code;
pub mod config;
pub mod http;
pub mod provider;
pub mod run;
pub mod state;

use eyre::{Result, WrapErr as _};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

/// The auth server's main function; can be called from a shim binary.
///
/// Parses CLI and starts the HTTP service.
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
            info!("Starting auth server with config at {}", config_path.display());

            run::start(&config_path, args.port, args.bind.as_deref()).await
        }
    }
}
