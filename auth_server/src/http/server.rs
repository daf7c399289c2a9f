//! Router assembly and the shared middleware stack.

use core::time::Duration;

use axum::{
    Router,
    http::header::{AUTHORIZATION, COOKIE},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    ServiceBuilderExt as _, request_id::MakeRequestUuid, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{
    http::{exchange, login},
    state::AppState,
};

/// Creates the auth server router: the login page, the credential login
/// operation and the code exchange. All routes are public; this service has
/// no protected resources of its own.
pub(crate) fn create_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::page).post(login::login_post))
        .route("/token", post(exchange::exchange))
}

/// Attaches state and the shared middleware stack, yielding the final app.
#[must_use]
pub fn create_app(app_state: AppState) -> Router<()> {
    let middleware_stack = ServiceBuilder::new()
        .sensitive_headers([AUTHORIZATION, COOKIE])
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    create_router().with_state(app_state).layer(middleware_stack)
}
