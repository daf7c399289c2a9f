//! Code-for-token exchange handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct ExchangeRequest {
    code: String,
}

#[derive(Serialize)]
struct ExchangeResponse {
    token: String,
}

/// Resolves an auth code to its bound token, exactly once.
///
/// Unknown, already-redeemed and expired codes all get the same 401; the
/// token from an earlier successful exchange is unaffected.
#[axum::debug_handler]
pub(crate) async fn exchange(
    State(AppState { codes, .. }): State<AppState>,
    Json(ExchangeRequest { code }): Json<ExchangeRequest>,
) -> axum::response::Response {
    match codes.redeem(&code) {
        Some(token) => Json(ExchangeResponse { token }).into_response(),
        None => {
            info!("rejected exchange for unknown or used code");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_code" })),
            )
                .into_response()
        }
    }
}
