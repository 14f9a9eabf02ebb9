use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::auth::{Claims, TokenKeys};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller context extracted from the token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Missing, malformed, wrongly signed or expired token.
    #[error("unauthorized")]
    Unauthorized,

    /// Valid token without admin privilege.
    #[error("forbidden")]
    Forbidden,
}

/// The authorization decision for one request. Pure: no I/O, no shared state
/// beyond the signing keys.
///
/// The raw header value is the token; no scheme prefix is stripped.
pub fn authorize(keys: &TokenKeys, raw_token: Option<&str>, now: DateTime<Utc>) -> Result<AuthUser, AuthError> {
    let token = match raw_token {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AuthError::Unauthorized),
    };

    let claims = keys.verify_at(token, now).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        AuthError::Unauthorized
    })?;

    if !claims.is_admin {
        return Err(AuthError::Forbidden);
    }

    Ok(AuthUser::from(claims))
}

/// Gate for admin-only routes. On success the caller's [`AuthUser`] is
/// inserted into the request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not valid UTF-8 cannot be a token
    let raw_token = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().unwrap_or_default()),
        None => None,
    };

    let auth_user = authorize(&state.tokens, raw_token, Utc::now()).map_err(|err| {
        tracing::warn!(path = %request.uri().path(), "authorization gate rejected request: {}", err);
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
