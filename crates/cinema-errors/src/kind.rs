use axum::http::StatusCode;

/// Kind of a server error
///
/// Each kind carries a fixed HTTP status, error code and default message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    DuplicateValue,
    UnprocessableEntity,
    /// Signature invalid, malformed token, or unsupported algorithm
    TokenDecode,
    /// Signature valid but the `exp` claim has passed
    TokenExpired,
    Internal,
}

impl ErrorKind {
    /// HTTP status the translator responds with
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateValue => StatusCode::CONFLICT,
            ErrorKind::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::TokenDecode | ErrorKind::TokenExpired => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code clients can branch on
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::DuplicateValue => "DUPLICATE_VALUE",
            ErrorKind::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorKind::TokenDecode => "TOKEN__DECODE_ERROR",
            ErrorKind::TokenExpired => "TOKEN__EXPIRE_TOKEN",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not found",
            ErrorKind::DuplicateValue => "Duplicate value",
            ErrorKind::UnprocessableEntity => "Unprocessable entity",
            ErrorKind::TokenDecode => "Invalid token",
            ErrorKind::TokenExpired => "Token expired",
            ErrorKind::Internal => "Internal server error",
        }
    }
}
