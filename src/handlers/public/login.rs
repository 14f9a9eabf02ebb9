use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Submitted credentials. Lives only for the duration of the request.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// POST /login - exchange admin credentials for a signed token
///
/// Only the configured admin identity can log in; anything else is answered
/// with 400 before a token is ever minted.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(credentials) = payload?;

    let is_admin = state
        .config
        .security
        .admin
        .verify(&credentials.username, &credentials.password);

    if !is_admin {
        tracing::warn!("rejected login attempt");
        return Err(ApiError::bad_request("Invalid admin credentials"));
    }

    let token = state.tokens.issue(&credentials.username, is_admin)?;
    tracing::info!(username = %credentials.username, "issued admin token");

    Ok(ApiResponse::success(LoginResponse { token, is_admin }))
}
