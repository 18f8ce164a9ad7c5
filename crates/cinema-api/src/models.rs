use cinema_auth::Claims;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Request carrying a session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Signed session token
    pub token: String,
}

/// Freshly issued session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token
    pub token: String,
}

/// Decoded token claims
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimsResponse {
    /// Claims including the `exp` Unix timestamp
    #[schema(value_type = Object)]
    pub claims: Claims,
}
