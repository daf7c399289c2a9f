//! Per-request authentication pipeline for protected routes.
//!
//! One pass per request, stages in fixed order over a shared
//! [`AuthContext`]:
//!
//! 1. auth-code stage — a `code` query parameter is exchanged for a token
//! 2. token stage — candidate tokens (exchanged, cookie, header) are
//!    verified locally; the first valid one attaches a [`Principal`]
//! 3. the protected resource runs
//! 4. cookie-writer stage — an authenticated response gets the token cookie
//!    rewritten with a refreshed expiry
//!
//! A request that ends stage 2 without a principal never reaches the
//! resource: it is 302-redirected to the auth server's login page with the
//! original URL, minus any spent `code` parameter, as the return target.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use axum_extra::extract::cookie::CookieJar;
use core::time::Duration;
use gatekeep_common::{Principal, ReadOnlyTokenCodec, TokenValidation};
use secrecy::{ExposeSecret as _, SecretString};
use tracing::{debug, warn};

use crate::{
    config::{ClientConfig, TokenSources},
    cookies::create_token_cookie,
    token_service::TokenService,
};

/// Shared state for the authentication middleware; cheap to clone.
#[derive(Clone)]
pub struct ClientState {
    pub config: Arc<ClientConfig>,
    pub verifier: Arc<ReadOnlyTokenCodec>,
    pub tokens: TokenService,
}

impl ClientState {
    /// Builds the middleware state from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange HTTP client cannot be constructed.
    pub fn from_config(config: ClientConfig) -> eyre::Result<Self> {
        let verifier = ReadOnlyTokenCodec::new(SecretString::from(
            config.secret.expose_secret(),
        ));
        let tokens = TokenService::new(
            &config.auth_server_url,
            Duration::from_secs(config.exchange_timeout_secs),
        )?;
        Ok(Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            tokens,
        })
    }
}

/// Mutable-within-request context threaded through the pipeline stages.
#[derive(Default)]
struct AuthContext {
    /// Token to persist in the cookie writer, once validated.
    token: Option<String>,
    /// Identity attached for the resource handler.
    principal: Option<Principal>,
}

/// Middleware that enforces authentication on every request it wraps.
pub async fn require(State(state): State<ClientState>, req: Request, next: Next) -> Response {
    let mut ctx = AuthContext::default();

    // Stage 1: exchange an inbound auth code, if any. Failure just leaves
    // the request unauthenticated.
    let exchanged = match query_param(req.uri(), "code") {
        Some(code) => match state.tokens.exchange(&code).await {
            Ok(token) => Some(token),
            Err(error) => {
                warn!(%error, "auth code exchange failed, continuing unauthenticated");
                None
            }
        },
        None => None,
    };

    // Stage 2: validate candidate tokens, first valid one wins.
    for candidate in candidate_tokens(exchanged, &req, &state.config) {
        match state.verifier.verify(&candidate) {
            TokenValidation::Valid(principal) => {
                ctx.token = Some(candidate);
                ctx.principal = Some(principal);
                break;
            }
            TokenValidation::Invalid => debug!("discarding invalid candidate token"),
        }
    }

    let Some(principal) = ctx.principal else {
        return redirect_to_login(&state.config, req.uri());
    };

    // Stage 3: the resource itself, with the principal in scope.
    let mut req = req;
    req.extensions_mut().insert(principal);
    let mut response = next.run(req).await;

    // Stage 4: slide the cookie window forward.
    if let Some(token) = ctx.token {
        let cookie = create_token_cookie(&state.config, &token);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(error) => warn!(%error, "token cookie not header-safe; skipping rewrite"),
        }
    }
    response
}

/// Candidate tokens in trust order: freshly exchanged, then the configured
/// inbound sources.
fn candidate_tokens(
    exchanged: Option<String>,
    req: &Request,
    config: &ClientConfig,
) -> Vec<String> {
    let mut candidates = Vec::new();
    candidates.extend(exchanged);

    let sources = config.token_sources;
    if matches!(sources, TokenSources::Cookie | TokenSources::Both) {
        let jar = CookieJar::from_headers(req.headers());
        if let Some(cookie) = jar.get(&config.cookie_name) {
            candidates.push(cookie.value().to_string());
        }
    }
    if matches!(sources, TokenSources::Header | TokenSources::Both)
        && let Some(bearer) = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    {
        candidates.push(bearer.to_string());
    }
    candidates
}

/// Extracts a single query parameter from the request URI.
fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.into_owned())
}

/// The sole entry into the login handshake: redirect to the auth server
/// with the current URL as the return target.
///
/// Any `code` parameter on the URL is spent by the time we get here, and the
/// auth server appends a fresh one on successful login. Carrying the dead
/// value along would make the post-login request exchange it again and fail,
/// so the return target is built without it.
fn redirect_to_login(config: &ClientConfig, uri: &Uri) -> Response {
    let return_to = strip_code_param(uri);
    let encoded: String = url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    let target = format!(
        "{}/login?redirect_to={encoded}",
        config.auth_server_url.trim_end_matches('/')
    );
    debug!(%target, "no valid token, redirecting to auth server login");
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

/// Rebuilds the request URI with every `code` query parameter removed.
fn strip_code_param(uri: &Uri) -> String {
    let path = uri.path();
    let Some(query) = uri.query() else {
        return path.to_string();
    };
    let mut remaining = url::form_urlencoded::Serializer::new(String::new());
    let mut kept_any = false;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "code" {
            remaining.append_pair(&key, &value);
            kept_any = true;
        }
    }
    if kept_any {
        format!("{path}?{}", remaining.finish())
    } else {
        path.to_string()
    }
}
