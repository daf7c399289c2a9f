//! Demo client application: a minimal protected site proving the handshake.

use core::net::{IpAddr, SocketAddr};
use std::path::Path;

use axum::{
    Extension, Router,
    middleware::from_fn_with_state,
    response::Html,
    routing::get,
};
use gatekeep_common::Principal;
use tokio::{net, signal};

use crate::{config, middleware::{ClientState, require}};

async fn landing() -> Html<&'static str> {
    Html(
        "<h1>gatekeep demo app</h1>\
         <p><a href=\"/dashboard\">dashboard</a> and \
         <a href=\"/profile\">profile</a> require sign-in.</p>",
    )
}

async fn dashboard(Extension(principal): Extension<Principal>) -> Html<String> {
    Html(format!("<h1>Dashboard</h1><p>Signed in as {}.</p>", principal.id))
}

async fn profile(Extension(principal): Extension<Principal>) -> Html<String> {
    Html(format!(
        "<h1>Profile</h1><p>{}, token expires at {} (unix seconds).</p>",
        principal.id, principal.expires_at
    ))
}

/// Creates the demo router: a public landing page plus protected pages
/// behind the authentication pipeline.
#[must_use]
pub fn create_router(state: ClientState) -> Router<()> {
    let protected = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
        .route_layer(from_fn_with_state(state, require));

    Router::new().route("/", get(landing)).merge(protected)
}

/// Loads configuration and runs the demo app until termination.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the server
/// cannot bind.
pub async fn start(
    config_path: &Path,
    port_override: Option<u16>,
    bind_override: Option<&str>,
) -> eyre::Result<()> {
    let config = config::load(config_path).await?;

    let listen_port = port_override.unwrap_or(config.server.port);
    let bind_str = bind_override.unwrap_or(&config.server.bind);
    let listen_ip: IpAddr = bind_str.parse()?;

    let state = ClientState::from_config(config.client)?;
    let app = create_router(state);

    let addr = SocketAddr::from((listen_ip, listen_port));
    tracing::info!("Listening on http://{}", addr);
    let listener = net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);
    tokio::select! {
        res = server => res?,
        _ = signal::ctrl_c() => {
            tracing::info!("Received shutdown, shutting down");
        }
    }

    Ok(())
}
