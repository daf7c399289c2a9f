//! Startup orchestration: load config, build state, serve until shutdown.

use core::net::{IpAddr, SocketAddr};
use std::path::Path;

use tokio::{net, signal};

use crate::{config, http, state};

/// Creates a future that resolves when a shutdown signal is received.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to create SIGTERM signal handler");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = signal::ctrl_c() => {}
        }
    }
    #[cfg(not(unix))]
    {
        drop(signal::ctrl_c().await);
    }
}

/// Loads configuration and runs the HTTP server until termination.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, state setup
/// fails (bad provider config), or the server cannot bind.
pub async fn start(
    config_path: &Path,
    port_override: Option<u16>,
    bind_override: Option<&str>,
) -> eyre::Result<()> {
    let config = config::load(config_path).await?;

    let listen_port = port_override.unwrap_or(config.server.port);
    let bind_str = bind_override.unwrap_or(&config.server.bind);
    let listen_ip: IpAddr = bind_str.parse()?;

    let app_state = state::initialize_state(&config).await?;
    let app = http::create_app(app_state);

    let addr = SocketAddr::from((listen_ip, listen_port));
    tracing::info!("Listening on http://{}", addr);
    let listener = net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);
    tokio::select! {
        res = server => res?,
        () = shutdown_signal() => {
            tracing::info!("Received shutdown, shutting down");
        }
    }

    Ok(())
}
