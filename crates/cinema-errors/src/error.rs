use std::borrow::Cow;

use axum::http::StatusCode;
use thiserror::Error;

use crate::kind::ErrorKind;

/// Result alias for fallible server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// A failure that is translated into an HTTP error response
///
/// Constructing one has no side effects. Two errors compare equal when kind
/// and message match; use [`ServerError::kind`] to dispatch on kind alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServerError {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl ServerError {
    /// Create an error carrying the kind's default message
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: Cow::Borrowed(kind.default_message()),
        }
    }

    /// Replace the default message
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    pub fn token_decode() -> Self {
        Self::new(ErrorKind::TokenDecode)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorKind::TokenExpired)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized).with_message(message)
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest).with_message(message)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal).with_message(message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ErrorKind> for ServerError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_kind() {
        let err = ServerError::token_decode();
        assert_eq!(err.kind(), ErrorKind::TokenDecode);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), "TOKEN__DECODE_ERROR");
        assert_eq!(err.message(), "Invalid token");
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[test]
    fn test_with_message_keeps_kind() {
        let err = ServerError::token_expired().with_message("Session is over");
        assert_eq!(err.kind(), ErrorKind::TokenExpired);
        assert_eq!(err.error_code(), "TOKEN__EXPIRE_TOKEN");
        assert_eq!(err.message(), "Session is over");
    }

    #[test]
    fn test_comparable_by_kind() {
        assert_eq!(ServerError::token_expired(), ServerError::token_expired());
        assert_ne!(ServerError::token_expired(), ServerError::token_decode());
        assert_eq!(
            ServerError::from(ErrorKind::NotFound),
            ServerError::not_found()
        );
    }

    #[test]
    fn test_owned_message() {
        let id = 42;
        let err = ServerError::bad_request(format!("Bad id {}", id));
        assert_eq!(err.message(), "Bad id 42");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
