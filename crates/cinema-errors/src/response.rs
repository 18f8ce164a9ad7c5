//! Error-to-response translation
//!
//! Any [`ServerError`] returned from a handler or middleware becomes a JSON
//! body `{"error_code": ..., "message": ...}` with the kind's HTTP status.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::ServerError;

/// JSON body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ErrorBody {
    /// Machine-readable error code
    pub error_code: String,
    /// Human-readable message
    pub message: String,
}

impl From<&ServerError> for ErrorBody {
    fn from(err: &ServerError) -> Self {
        Self {
            error_code: err.error_code().to_string(),
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self.message());
        } else {
            debug!(status = status.as_u16(), code = self.error_code(), "{}", self.message());
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use axum::http::StatusCode;

    async fn render(err: ServerError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_decode_error_response() {
        let (status, body) = render(ServerError::token_decode()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error_code, "TOKEN__DECODE_ERROR");
        assert_eq!(body.message, "Invalid token");
    }

    #[tokio::test]
    async fn test_expired_error_response() {
        let (status, body) = render(ServerError::token_expired()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error_code, "TOKEN__EXPIRE_TOKEN");
        assert_eq!(body.message, "Token expired");
    }

    #[tokio::test]
    async fn test_body_has_exactly_two_fields() {
        let response = ServerError::not_found().into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"error_code": "NOT_FOUND", "message": "Not found"})
        );
    }

    #[tokio::test]
    async fn test_every_kind_renders_its_status() {
        for kind in [
            ErrorKind::BadRequest,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::DuplicateValue,
            ErrorKind::UnprocessableEntity,
            ErrorKind::TokenDecode,
            ErrorKind::TokenExpired,
            ErrorKind::Internal,
        ] {
            let (status, body) = render(ServerError::new(kind)).await;
            assert_eq!(status, kind.status());
            assert_eq!(body.error_code, kind.code());
            assert_eq!(body.message, kind.default_message());
        }
    }
}
