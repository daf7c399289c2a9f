//! Login page and credential login handler.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    http::{LOGIN_ERROR_CREDENTIALS, login_error_redirect},
    state::AppState,
};

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Sign in</title></head>
<body>
<h1>Sign in</h1>
{ maybe_error }
<form method="post" action="/login{ action_query }">
  <label>Login <input type="text" name="login" autofocus></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Sign in</button>
</form>
</body>
</html>
"#;

const ERROR_BANNER: &str = "<p class=\"error\">Login failed. Check your credentials and try again.</p>";

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    login: String,
    password: SecretString,
}

#[derive(Deserialize, Default)]
pub(crate) struct LoginQuery {
    pub redirect_to: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize)]
struct TokenBody {
    token: String,
}

/// Handle GET requests to the login page.
#[axum::debug_handler]
pub(crate) async fn page(
    Query(LoginQuery { redirect_to, error }): Query<LoginQuery>,
) -> impl IntoResponse {
    let maybe_error = match error.as_deref() {
        Some(_) => ERROR_BANNER,
        None => "",
    };
    // Carry redirect_to through the form so the POST can send the user back.
    let action_query = redirect_to.map_or_else(String::new, |target| {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("?redirect_to={encoded}")
    });
    let html = LOGIN_PAGE
        .replace("{ maybe_error }", maybe_error)
        .replace("{ action_query }", &action_query);
    Html(html)
}

/// Handle POST requests with a credential pair.
///
/// On success with a `redirect_to` target, binds an auth code to the fresh
/// token and redirects back to the client application with `code` appended.
/// Without a target the token is returned directly as JSON. Failure is a
/// uniform redirect back to the login page.
///
/// The return target is accepted verbatim; there is no allowlist of client
/// URLs, so deployments that need one must enforce it in front of this
/// endpoint.
#[axum::debug_handler]
pub(crate) async fn login_post(
    State(AppState { accounts, codes }): State<AppState>,
    Query(LoginQuery { redirect_to, .. }): Query<LoginQuery>,
    Form(LoginForm { login, password }): Form<LoginForm>,
) -> axum::response::Response {
    let Ok(token) = accounts.login(&login, &password).await else {
        info!("login rejected");
        return login_error_redirect(LOGIN_ERROR_CREDENTIALS, redirect_to.as_deref())
            .into_response();
    };

    match redirect_to {
        Some(target) => {
            let code = codes.bind(token);
            Redirect::to(&append_code(&target, &code)).into_response()
        }
        None => Json(TokenBody { token }).into_response(),
    }
}

/// Appends the `code` query parameter to the client-supplied return URL.
fn append_code(redirect_to: &str, code: &str) -> String {
    let separator = if redirect_to.contains('?') { '&' } else { '?' };
    format!("{redirect_to}{separator}code={code}")
}
