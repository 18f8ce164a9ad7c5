//! Bearer Token Authentication Middleware
//!
//! Extracts the session token from the `Authorization` header, verifies it and
//! makes the decoded claims available to handlers via Axum's Extension.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use cinema_auth::Claims;
use cinema_errors::{ServerError, ServerResult};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

/// Claims of the authenticated caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> ServerResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::unauthorized("Missing authentication token"))?;

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ServerError::unauthorized(
            "Invalid Authorization header format. Expected 'Bearer <token>'",
        ));
    }

    Ok(token)
}

/// Authentication middleware that verifies bearer session tokens
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - the Authorization header is missing or not a Bearer header (`UNAUTHORIZED`)
/// - the token is malformed or wrongly signed (`TOKEN__DECODE_ERROR`)
/// - the token is expired (`TOKEN__EXPIRE_TOKEN`)
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> ServerResult<Response> {
    let token = bearer_token(request.headers()).inspect_err(|e| {
        debug!("Rejected request without usable bearer token: {}", e);
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!(kind = ?e.kind(), "Token verification failed: {}", e);
        ServerError::from(e)
    })?;

    request.extensions_mut().insert(AuthClaims(claims));

    Ok(next.run(request).await)
}
