//! In-process tests of the client-side authentication pipeline, plus a full
//! handshake against a real auth server instance.

use core::time::Duration;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use gatekeep_common::{TokenCodec, DEFAULT_VALIDITY};
use secrecy::SecretString;
use tower::ServiceExt as _;

use gatekeep_client::{
    config::{ClientConfig, TokenSources},
    demo::create_router,
    middleware::ClientState,
};

const SECRET: &str = "pipeline-test-secret";

fn client_config(auth_server_url: &str, sources: TokenSources) -> ClientConfig {
    ClientConfig {
        auth_server_url: auth_server_url.to_string(),
        secret: Arc::new(SecretString::from(SECRET)),
        cookie_name: "gatekeep_token".to_string(),
        token_sources: sources,
        cookie_validity_days: 15,
        exchange_timeout_secs: 2,
    }
}

fn app(auth_server_url: &str, sources: TokenSources) -> axum::Router {
    let state = ClientState::from_config(client_config(auth_server_url, sources))
        .expect("client state builds");
    create_router(state)
}

fn issue_token(id: &str) -> String {
    TokenCodec::new(SecretString::from(SECRET), DEFAULT_VALIDITY).issue(id)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

/// Spawns a real auth server on an ephemeral port and returns its base URL.
async fn start_auth_server() -> String {
    let auth_config: gatekeep_auth_server::config::AuthServerConfig = toml::from_str(&format!(
        r#"
        [auth]
        secret = "{SECRET}"

        [[providers]]
        type = "in_memory"
        users = {{ alice = "pw1" }}
        "#
    ))
    .expect("auth config parses");
    let auth_state = gatekeep_auth_server::state::initialize_state(&auth_config)
        .await
        .expect("auth state builds");
    let auth_app = gatekeep_auth_server::http::create_app(auth_state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral bind");
    let auth_url = format!("http://{}", listener.local_addr().expect("local addr"));
    tokio::spawn(async move {
        axum::serve(listener, auth_app).await.expect("auth server runs");
    });
    auth_url
}

fn redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client builds")
}

#[tokio::test]
async fn unauthenticated_request_redirects_to_auth_server_login() {
    let app = app("http://auth.example", TokenSources::Both);
    let response = app.oneshot(get("/dashboard")).await.expect("call");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://auth.example/login?redirect_to=%2Fdashboard"
    );
}

#[tokio::test]
async fn public_route_needs_no_token() {
    let app = app("http://auth.example", TokenSources::Both);
    let response = app.oneshot(get("/")).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_cookie_token_authenticates_and_slides_the_cookie() {
    let app = app("http://auth.example", TokenSources::Both);
    let token = issue_token("alice");

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("gatekeep_token={token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("set-cookie is ascii");
    assert!(set_cookie.starts_with(&format!("gatekeep_token={token}")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    assert!(String::from_utf8_lossy(&body).contains("alice"));
}

#[tokio::test]
async fn bearer_header_token_authenticates_when_policy_allows() {
    let app = app("http://auth.example", TokenSources::Header);
    let token = issue_token("bob");

    let request = Request::builder()
        .uri("/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn cookie_only_policy_ignores_bearer_header() {
    let app = app("http://auth.example", TokenSources::Cookie);
    let token = issue_token("bob");

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("call");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn tampered_cookie_token_is_unauthenticated() {
    let app = app("http://auth.example", TokenSources::Both);
    let mut token = issue_token("alice");
    token.push('x');

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("gatekeep_token={token}"))
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("call");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn failed_exchange_falls_through_to_login_redirect() {
    // nothing listens on the discard port, so the exchange times out fast
    let app = app("http://127.0.0.1:9", TokenSources::Both);
    let response = app
        .oneshot(get("/dashboard?code=stale"))
        .await
        .expect("call");
    assert!(response.status().is_redirection());
    // The dead code is dropped from the return target so re-login can work.
    assert_eq!(
        response.headers()[header::LOCATION],
        "http://127.0.0.1:9/login?redirect_to=%2Fdashboard"
    );
}

/// A revisited URL carrying a spent code must still let the user back in:
/// login redirect without the dead code, fresh code on re-login, resource
/// served when the redirect is followed.
#[tokio::test]
async fn stale_code_relogin_reaches_the_resource() {
    let auth_url = start_auth_server().await;
    let app = app(&auth_url, TokenSources::Both);

    // The spent code fails to exchange; the login target must not carry it.
    let response = app
        .clone()
        .oneshot(get("/dashboard?tab=1&code=spent"))
        .await
        .expect("call");
    assert_eq!(response.status(), StatusCode::FOUND);
    let login_url = response.headers()[header::LOCATION]
        .to_str()
        .expect("location header")
        .to_string();
    assert_eq!(
        login_url,
        format!("{auth_url}/login?redirect_to=%2Fdashboard%3Ftab%3D1")
    );

    // Logging in again issues exactly one fresh code on the return URL.
    let response = redirect_client()
        .post(&login_url)
        .form(&[("login", "alice"), ("password", "pw1")])
        .send()
        .await
        .expect("login posts");
    assert!(response.status().is_redirection());
    let back = response.headers()[header::LOCATION]
        .to_str()
        .expect("location header")
        .to_string();
    assert!(back.starts_with("/dashboard?tab=1&code="));
    assert_eq!(back.matches("code=").count(), 1);

    // Following the redirect exchanges the fresh code and serves the page.
    let response = app.oneshot(get(&back)).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}

/// Full handshake against a real auth server: login -> redirect with code ->
/// client exchanges the code -> cookie-carried stateless re-validation.
#[tokio::test]
async fn full_handshake_end_to_end() {
    let auth_url = start_auth_server().await;
    let app = app(&auth_url, TokenSources::Both);

    // Unauthenticated request is pointed at the auth server login.
    let response = app.clone().oneshot(get("/dashboard")).await.expect("call");
    assert!(response.status().is_redirection());
    let login_url = response.headers()[header::LOCATION]
        .to_str()
        .expect("location header")
        .to_string();
    assert_eq!(login_url, format!("{auth_url}/login?redirect_to=%2Fdashboard"));

    // The user submits credentials; the auth server redirects back with a code.
    let response = redirect_client()
        .post(format!("{auth_url}/login?redirect_to=%2Fdashboard"))
        .form(&[("login", "alice"), ("password", "pw1")])
        .send()
        .await
        .expect("login posts");
    assert!(response.status().is_redirection());
    let back = response.headers()[header::LOCATION]
        .to_str()
        .expect("location header")
        .to_string();
    assert!(back.starts_with("/dashboard?code="));

    // The client app exchanges the code and serves the resource.
    let response = app.clone().oneshot(get(&back)).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("set-cookie is ascii")
        .to_string();
    let token_pair = set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();

    // Subsequent request validates locally off the cookie, no code needed.
    let request = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, token_pair)
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}
