//! HTTP surface of the auth server: the login page, the credential login
//! operation and the code-for-token exchange.

pub mod exchange;
pub mod login;
pub mod server;

pub use server::create_app;

use axum::response::Redirect;

// Centralized login error keys used as query values on /login?error=<key>
pub(crate) const LOGIN_ERROR_CREDENTIALS: &str = "credentials";

// Helper function for login error redirects
pub(crate) fn login_error_redirect(error: &str, redirect_to: Option<&str>) -> Redirect {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", error);
    if let Some(redirect_to) = redirect_to {
        query.append_pair("redirect_to", redirect_to);
    }
    Redirect::to(&format!("/login?{}", query.finish()))
}
