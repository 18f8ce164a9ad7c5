use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use cinema_errors::{ErrorBody, ErrorKind, ServerError, ServerResult};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::middleware::AuthClaims;
use crate::models::*;
use crate::{ApiDoc, AppState};

/// Turn a body rejection into the uniform error format
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ServerError::new(ErrorKind::UnprocessableEntity).with_message(e.body_text()))
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/v1/common/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "common"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Verify a session token and return its claims
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token is valid", body = ClaimsResponse),
        (status = 401, description = "Token is invalid or expired", body = ErrorBody),
        (status = 422, description = "Malformed request body", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ServerResult<Json<ClaimsResponse>> {
    let request = json_body(payload)?;
    let claims = state.tokens.verify(&request.token)?;

    debug!(sub = ?claims.subject(), "Verified session token");

    Ok(Json(ClaimsResponse { claims }))
}

/// Reissue a session token from a well-signed, possibly expired one
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "New session token", body = TokenResponse),
        (status = 401, description = "Token is invalid", body = ErrorBody),
        (status = 422, description = "Malformed request body", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ServerResult<Json<TokenResponse>> {
    let request = json_body(payload)?;
    let token = state.tokens.refresh(&request.token)?;

    info!("Refreshed session token");

    Ok(Json(TokenResponse { token }))
}

/// Get the claims of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Caller's claims", body = ClaimsResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get_current_user(
    Extension(AuthClaims(claims)): Extension<AuthClaims>,
) -> Json<ClaimsResponse> {
    Json(ClaimsResponse { claims })
}

/// OpenAPI document
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn not_found() -> ServerError {
    ServerError::not_found()
}
